// src/sitemap/parse.rs
// =============================================================================
// Parses sitemap XML with `quick-xml`'s streaming reader.
//
// Two document shapes are handled:
//
//   <urlset>                          <sitemapindex>
//     <url>                             <sitemap>
//       <loc>...</loc>                    <loc>child.xml</loc>
//       <lastmod>...</lastmod>          </sitemap>
//       <image:image>                 </sitemapindex>
//         <image:loc>...</image:loc>
//       </image:image>
//     </url>
//   </urlset>
//
// Namespaced tags are matched on their local name, so <image:loc> and <loc>
// are told apart only by whether we are inside an <image> element.
// =============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Result, WarmError};

// One <url> entry, before any URL validation
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub images: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum SitemapDocument {
    /// A regular <urlset>
    Pages(Vec<SitemapEntry>),
    /// A <sitemapindex>: locations of child sitemaps
    Index(Vec<String>),
}

// Which text-bearing element we're currently inside
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    PageLoc,
    LastMod,
    ImageLoc,
    ChildLoc,
}

pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut is_index = None;
    let mut pages = Vec::new();
    let mut children = Vec::new();

    let mut current: Option<SitemapEntry> = None;
    let mut in_image = false;
    let mut in_child = false;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

                if is_index.is_none() {
                    is_index = Some(root_is_index(&name)?);
                    continue;
                }

                match name.as_str() {
                    "url" => {
                        current = Some(SitemapEntry {
                            loc: String::new(),
                            last_modified: None,
                            images: Vec::new(),
                        })
                    }
                    "image" if current.is_some() => in_image = true,
                    "sitemap" => in_child = true,
                    "loc" if in_image => field = Some(Field::ImageLoc),
                    "loc" if current.is_some() => field = Some(Field::PageLoc),
                    "loc" if in_child => field = Some(Field::ChildLoc),
                    "lastmod" if current.is_some() && !in_image => field = Some(Field::LastMod),
                    _ => {}
                }
            }
            // <urlset/>: an empty but valid sitemap
            Ok(Event::Empty(e)) if is_index.is_none() => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                is_index = Some(root_is_index(&name)?);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "url" => {
                        if let Some(entry) = current.take() {
                            if !entry.loc.is_empty() {
                                pages.push(entry);
                            }
                        }
                    }
                    "image" => in_image = false,
                    "sitemap" => in_child = false,
                    _ => {}
                }
                field = None;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| WarmError::SitemapParse(e.to_string()))?;
                store_text(field, text.trim(), &mut current, &mut children);
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                let text = String::from_utf8_lossy(&raw);
                store_text(field, text.trim(), &mut current, &mut children);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(WarmError::SitemapParse(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    match is_index {
        Some(true) => Ok(SitemapDocument::Index(children)),
        Some(false) => Ok(SitemapDocument::Pages(pages)),
        None => Err(WarmError::SitemapParse("document has no root element".to_string())),
    }
}

// The root element decides the document shape
fn root_is_index(name: &str) -> Result<bool> {
    match name {
        "urlset" => Ok(false),
        "sitemapindex" => Ok(true),
        _ => Err(WarmError::SitemapParse(format!(
            "unexpected root element <{}>",
            name
        ))),
    }
}

fn store_text(
    field: Option<Field>,
    text: &str,
    current: &mut Option<SitemapEntry>,
    children: &mut Vec<String>,
) {
    if text.is_empty() {
        return;
    }

    match (field, current.as_mut()) {
        (Some(Field::PageLoc), Some(entry)) => entry.loc = text.to_string(),
        (Some(Field::LastMod), Some(entry)) => entry.last_modified = parse_lastmod(text),
        (Some(Field::ImageLoc), Some(entry)) => entry.images.push(text.to_string()),
        (Some(Field::ChildLoc), _) => children.push(text.to_string()),
        _ => {}
    }
}

// Parses the W3C datetime flavours sitemaps use in <lastmod>
//
//   2024-01-15
//   2024-01-15T10:30:00Z / 2024-01-15T10:30:00+07:00
//   2024-01-15T10:30:00 (assumed UTC)
pub fn parse_lastmod(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Some generators drop the seconds: 2024-01-15T10:30+00:00
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
