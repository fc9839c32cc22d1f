//! Parsers for the `Updates.php` XML documents.
//!
//! Both the server-time and the updates responses share one shape:
//!
//! ```xml
//! <Items>
//!   <Time>1361923300</Time>
//!   <Series>80348</Series>
//!   <Series>121361</Series>
//!   <Episode>4416901</Episode>
//! </Items>
//! ```

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{Result, TvdbError};
use crate::types::Updates;

const TIME_ELEMENT: &[u8] = b"Time";
const SERIES_ELEMENT: &[u8] = b"Series";

/// Parse an updates document into its server time and changed series ids.
///
/// The first `<Time>` element anywhere in the document wins. Every
/// `<Series>` element contributes its text content, in document order;
/// empty elements yield empty strings and are left for the caller to filter.
pub fn parse_updates(xml: &[u8]) -> Result<Updates> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut updates = Updates::default();
    let mut buf = Vec::new();

    let mut time_text: Option<String> = None;
    let mut series_text: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                TIME_ELEMENT if updates.time.is_none() => time_text = Some(String::new()),
                SERIES_ELEMENT => series_text = Some(String::new()),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == SERIES_ELEMENT {
                    updates.series.push(String::new());
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| TvdbError::Parse(format!("Invalid text content: {}", e)))?;
                append_text(&mut time_text, &mut series_text, &text);
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                let text = String::from_utf8_lossy(&raw);
                append_text(&mut time_text, &mut series_text, &text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                TIME_ELEMENT => {
                    if let Some(text) = time_text.take() {
                        updates.time = Some(text);
                    }
                }
                SERIES_ELEMENT => {
                    if let Some(text) = series_text.take() {
                        updates.series.push(text);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(TvdbError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(updates)
}

/// Parse a server-time document, requiring a `<Time>` element.
pub fn parse_server_time(xml: &[u8]) -> Result<String> {
    parse_updates(xml)?
        .time
        .ok_or_else(|| TvdbError::Parse("Missing <Time> element".to_string()))
}

fn append_text(time_text: &mut Option<String>, series_text: &mut Option<String>, text: &str) {
    if let Some(time) = time_text.as_mut() {
        time.push_str(text);
    }
    if let Some(series) = series_text.as_mut() {
        series.push_str(text);
    }
}
