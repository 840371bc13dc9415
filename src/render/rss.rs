use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::app::error::{GramfeedError, Result};
use crate::domain::FeedResult;

/// Serialize a feed as an RSS 2.0 document
pub fn write_rss(feed: &FeedResult) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    write(&mut writer, Event::Start(rss))?;
    write(&mut writer, Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &feed.title)?;
    text_element(&mut writer, "link", &feed.link)?;
    text_element(&mut writer, "description", &feed.description)?;

    if let Some(ref image) = feed.image {
        write(&mut writer, Event::Start(BytesStart::new("image")))?;
        text_element(&mut writer, "url", image)?;
        text_element(&mut writer, "title", &feed.title)?;
        text_element(&mut writer, "link", &feed.link)?;
        write(&mut writer, Event::End(BytesEnd::new("image")))?;
    }

    for item in &feed.items {
        write(&mut writer, Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", item.display_title())?;
        text_element(&mut writer, "description", &item.description)?;
        text_element(&mut writer, "link", &item.link)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "false"));
        write(&mut writer, Event::Start(guid))?;
        write(&mut writer, Event::Text(BytesText::new(&item.id)))?;
        write(&mut writer, Event::End(BytesEnd::new("guid")))?;

        text_element(&mut writer, "pubDate", &item.publish_date.to_rfc2822())?;
        write(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("channel")))?;
    write(&mut writer, Event::End(BytesEnd::new("rss")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| GramfeedError::Render(e.to_string()))
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| GramfeedError::Render(e.to_string()))
}
