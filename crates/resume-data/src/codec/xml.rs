//! XML interchange format.
//!
//! Layout:
//! - root element `<resume>`;
//! - element names are the camelCase field names used by the JSON and YAML formats;
//! - lists are repeated sibling elements (`<highlights>` once per highlight);
//! - each group pair is two `<work>` (or `<publications>`) elements, each holding a `<label>`
//!   and repeated `<entries>`.
//!
//! Text is written verbatim apart from escaping, and read back without trimming, so leading
//! and trailing whitespace survive. Carriage returns and other control characters are written
//! as numeric character references because XML parsers normalise or reject them as literals.
//! Empty strings are written as empty elements; missing elements read back as empty strings.

use crate::model::{
    Basics, Education, EntryGroup, GroupPair, Location, Publication, Resume, Skill,
    SocialProfile, Work,
};
use crate::{DataError, DataResult};
use fodder_types::DataFormat;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Write as _;

const FORMAT: DataFormat = DataFormat::Xml;
const ROOT: &str = "resume";
const INDENT: &str = "  ";

pub(super) fn encode(resume: &Resume) -> DataResult<Vec<u8>> {
    let mut out = XmlOut::new();
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.open(ROOT)?;
    out.text("version", &resume.version.to_string())?;
    out.record("basics", &resume.basics)?;
    out.groups("work", &resume.work)?;
    out.records("education", &resume.education)?;
    out.groups("publications", &resume.publications)?;
    out.records("skills", &resume.skills)?;
    out.close(ROOT)?;
    out.finish()
}

pub(super) fn decode(bytes: &[u8]) -> DataResult<Resume> {
    let text = std::str::from_utf8(bytes).map_err(|e| DataError::malformed(FORMAT, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let root = parse_tree(text)?;

    if root.name != ROOT {
        return Err(DataError::mismatch(
            FORMAT,
            "",
            format!("expected root element <{ROOT}>, found <{}>", root.name),
        ));
    }

    let node = Node {
        element: &root,
        path: String::new(),
    };
    let version = node.text("version")?;
    let version = match version.trim() {
        "" => 0,
        digits => digits
            .parse::<u32>()
            .map_err(|e| DataError::mismatch(FORMAT, "version", e))?,
    };

    Ok(Resume {
        version,
        basics: node.record("basics")?,
        work: node.groups("work")?,
        education: node.records("education")?,
        publications: node.groups("publications")?,
        skills: node.records("skills")?,
    })
}

/// A record type that maps onto the children of one XML element.
trait XmlRecord: Default {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()>;
    fn read_fields(node: &Node<'_>) -> DataResult<Self>;
}

impl XmlRecord for Basics {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()> {
        out.text("name", &self.name)?;
        out.text("label", &self.label)?;
        out.text("email", &self.email)?;
        out.text("phone", &self.phone)?;
        out.text("website", &self.website)?;
        out.text("summary", &self.summary)?;
        out.texts("highlights", &self.highlights)?;
        out.record("location", &self.location)?;
        out.records("profiles", &self.profiles)
    }

    fn read_fields(node: &Node<'_>) -> DataResult<Self> {
        Ok(Self {
            name: node.text("name")?,
            label: node.text("label")?,
            email: node.text("email")?,
            phone: node.text("phone")?,
            website: node.text("website")?,
            summary: node.text("summary")?,
            highlights: node.texts("highlights")?,
            location: node.record("location")?,
            profiles: node.records("profiles")?,
        })
    }
}

impl XmlRecord for Location {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()> {
        out.text("address", &self.address)?;
        out.text("postalCode", &self.postal_code)?;
        out.text("city", &self.city)?;
        out.text("countryCode", &self.country_code)?;
        out.text("region", &self.region)
    }

    fn read_fields(node: &Node<'_>) -> DataResult<Self> {
        Ok(Self {
            address: node.text("address")?,
            postal_code: node.text("postalCode")?,
            city: node.text("city")?,
            country_code: node.text("countryCode")?,
            region: node.text("region")?,
        })
    }
}

impl XmlRecord for SocialProfile {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()> {
        out.text("network", &self.network)?;
        out.text("username", &self.username)?;
        out.text("url", &self.url)
    }

    fn read_fields(node: &Node<'_>) -> DataResult<Self> {
        Ok(Self {
            network: node.text("network")?,
            username: node.text("username")?,
            url: node.text("url")?,
        })
    }
}

impl XmlRecord for Work {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()> {
        out.text("company", &self.company)?;
        out.text("position", &self.position)?;
        out.text("website", &self.website)?;
        out.text("startDate", &self.start_date)?;
        out.text("endDate", &self.end_date)?;
        out.text("summary", &self.summary)?;
        out.texts("highlights", &self.highlights)
    }

    fn read_fields(node: &Node<'_>) -> DataResult<Self> {
        Ok(Self {
            company: node.text("company")?,
            position: node.text("position")?,
            website: node.text("website")?,
            start_date: node.text("startDate")?,
            end_date: node.text("endDate")?,
            summary: node.text("summary")?,
            highlights: node.texts("highlights")?,
        })
    }
}

impl XmlRecord for Education {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()> {
        out.text("institution", &self.institution)?;
        out.text("area", &self.area)?;
        out.text("studyType", &self.study_type)?;
        out.text("startDate", &self.start_date)?;
        out.text("endDate", &self.end_date)?;
        out.text("gpa", &self.gpa)?;
        out.texts("courses", &self.courses)
    }

    fn read_fields(node: &Node<'_>) -> DataResult<Self> {
        Ok(Self {
            institution: node.text("institution")?,
            area: node.text("area")?,
            study_type: node.text("studyType")?,
            start_date: node.text("startDate")?,
            end_date: node.text("endDate")?,
            gpa: node.text("gpa")?,
            courses: node.texts("courses")?,
        })
    }
}

impl XmlRecord for Publication {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()> {
        out.text("name", &self.name)?;
        out.text("publisher", &self.publisher)?;
        out.text("releaseDate", &self.release_date)?;
        out.text("website", &self.website)?;
        out.text("summary", &self.summary)?;
        out.text("isbn", &self.isbn)
    }

    fn read_fields(node: &Node<'_>) -> DataResult<Self> {
        Ok(Self {
            name: node.text("name")?,
            publisher: node.text("publisher")?,
            release_date: node.text("releaseDate")?,
            website: node.text("website")?,
            summary: node.text("summary")?,
            isbn: node.text("isbn")?,
        })
    }
}

impl XmlRecord for Skill {
    fn write_fields(&self, out: &mut XmlOut) -> DataResult<()> {
        out.text("name", &self.name)?;
        out.text("level", &self.level)?;
        out.texts("keywords", &self.keywords)
    }

    fn read_fields(node: &Node<'_>) -> DataResult<Self> {
        Ok(Self {
            name: node.text("name")?,
            level: node.text("level")?,
            keywords: node.texts("keywords")?,
        })
    }
}

/// Event writer that indents element structure but never touches text content.
struct XmlOut {
    writer: Writer<Vec<u8>>,
    depth: usize,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            depth: 0,
        }
    }

    fn event(&mut self, event: Event<'_>) -> DataResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| DataError::serialization(FORMAT, e))
    }

    fn line_break(&mut self) -> DataResult<()> {
        let indent = format!("\n{}", INDENT.repeat(self.depth));
        self.event(Event::Text(BytesText::from_escaped(indent)))
    }

    fn open(&mut self, name: &str) -> DataResult<()> {
        self.line_break()?;
        self.event(Event::Start(BytesStart::new(name)))?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, name: &str) -> DataResult<()> {
        self.depth = self.depth.saturating_sub(1);
        self.line_break()?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, name: &str, value: &str) -> DataResult<()> {
        self.line_break()?;
        if value.is_empty() {
            return self.event(Event::Empty(BytesStart::new(name)));
        }
        self.event(Event::Start(BytesStart::new(name)))?;
        self.event(Event::Text(BytesText::from_escaped(escape_text(value))))?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn texts(&mut self, name: &str, values: &[String]) -> DataResult<()> {
        values.iter().try_for_each(|value| self.text(name, value))
    }

    fn record<T: XmlRecord>(&mut self, name: &str, value: &T) -> DataResult<()> {
        self.open(name)?;
        value.write_fields(self)?;
        self.close(name)
    }

    fn records<T: XmlRecord>(&mut self, name: &str, values: &[T]) -> DataResult<()> {
        values.iter().try_for_each(|value| self.record(name, value))
    }

    fn groups<T: XmlRecord>(&mut self, name: &str, groups: &GroupPair<T>) -> DataResult<()> {
        for group in groups {
            self.open(name)?;
            self.text("label", &group.label)?;
            self.records("entries", &group.entries)?;
            self.close(name)?;
        }
        Ok(())
    }

    fn finish(mut self) -> DataResult<Vec<u8>> {
        self.event(Event::Text(BytesText::from_escaped("\n")))?;
        Ok(self.writer.into_inner())
    }
}

/// Escape markup characters, and write control characters (other than tab and line feed) as
/// character references.
fn escape_text(value: &str) -> String {
    let escaped = quick_xml::escape::partial_escape(value);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            let _ = write!(out, "&#x{:X};", u32::from(c));
        } else {
            out.push(c);
        }
    }
    out
}

/// Minimal element tree: only names, concatenated text and child elements are kept.
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

fn parse_tree(text: &str) -> DataResult<Element> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(|e| DataError::malformed(FORMAT, e))? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(DataError::malformed(FORMAT, "content after the root element"));
                }
                stack.push(Element {
                    name: element_name(start.name().as_ref())?,
                    ..Element::default()
                });
            }
            Event::Empty(start) => {
                let element = Element {
                    name: element_name(start.name().as_ref())?,
                    ..Element::default()
                };
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DataError::malformed(FORMAT, "unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(content) => {
                let raw = std::str::from_utf8(&content)
                    .map_err(|e| DataError::malformed(FORMAT, e))?;
                let unescaped =
                    quick_xml::escape::unescape(raw).map_err(|e| DataError::malformed(FORMAT, e))?;
                append_text(&mut stack, &unescaped)?;
            }
            Event::GeneralRef(reference) => {
                let name = std::str::from_utf8(&reference)
                    .map_err(|e| DataError::malformed(FORMAT, e))?;
                append_text(&mut stack, &resolve_reference(name)?)?;
            }
            Event::CData(data) => {
                let raw = std::str::from_utf8(&data).map_err(|e| DataError::malformed(FORMAT, e))?;
                append_text(&mut stack, raw)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DataError::malformed(
            FORMAT,
            format!("unexpected end of document inside <{}>", open.name),
        ));
    }
    root.ok_or_else(|| DataError::malformed(FORMAT, "document has no root element"))
}

fn element_name(raw: &[u8]) -> DataResult<String> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|e| DataError::malformed(FORMAT, e))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> DataResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(DataError::malformed(FORMAT, "more than one root element"));
        }
    }
    Ok(())
}

fn append_text(stack: &mut [Element], text: &str) -> DataResult<()> {
    match stack.last_mut() {
        Some(element) => element.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(DataError::malformed(FORMAT, "text outside the root element"));
        }
    }
    Ok(())
}

/// Resolve `&name;` where `name` is a predefined entity or a `#` character reference.
fn resolve_reference(name: &str) -> DataResult<String> {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        return parsed
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| {
                DataError::malformed(FORMAT, format!("invalid character reference &{name};"))
            });
    }

    quick_xml::escape::resolve_predefined_entity(name)
        .map(str::to_owned)
        .ok_or_else(|| DataError::malformed(FORMAT, format!("unknown entity &{name};")))
}

/// Read-side view of an element plus its dotted path for error reporting.
struct Node<'a> {
    element: &'a Element,
    path: String,
}

impl<'a> Node<'a> {
    fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    fn first(&self, name: &str) -> Option<&'a Element> {
        self.element.children.iter().find(|child| child.name == name)
    }

    fn all(&self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.element
            .children
            .iter()
            .filter(move |child| child.name == name)
    }

    fn text(&self, name: &str) -> DataResult<String> {
        match self.first(name) {
            Some(child) => scalar(child, self.child_path(name)),
            None => Ok(String::new()),
        }
    }

    fn texts(&self, name: &'a str) -> DataResult<Vec<String>> {
        let base = self.child_path(name);
        self.all(name)
            .enumerate()
            .map(|(index, child)| scalar(child, format!("{base}[{index}]")))
            .collect()
    }

    fn record<T: XmlRecord>(&self, name: &str) -> DataResult<T> {
        match self.first(name) {
            Some(child) => T::read_fields(&Node {
                element: child,
                path: self.child_path(name),
            }),
            None => Ok(T::default()),
        }
    }

    fn records<T: XmlRecord>(&self, name: &'a str) -> DataResult<Vec<T>> {
        let base = self.child_path(name);
        self.all(name)
            .enumerate()
            .map(|(index, child)| {
                T::read_fields(&Node {
                    element: child,
                    path: format!("{base}[{index}]"),
                })
            })
            .collect()
    }

    fn groups<T: XmlRecord>(&self, name: &'a str) -> DataResult<GroupPair<T>> {
        let base = self.child_path(name);
        let mut groups: GroupPair<T> = Default::default();
        for (index, child) in self.all(name).enumerate() {
            let slot = groups.get_mut(index).ok_or_else(|| {
                DataError::mismatch(FORMAT, base.clone(), "expected at most 2 groups")
            })?;
            let node = Node {
                element: child,
                path: format!("{base}[{index}]"),
            };
            *slot = EntryGroup {
                label: node.text("label")?,
                entries: node.records("entries")?,
            };
        }
        Ok(groups)
    }
}

fn scalar(element: &Element, path: String) -> DataResult<String> {
    if let Some(child) = element.children.first() {
        return Err(DataError::mismatch(
            FORMAT,
            path,
            format!("expected text, found element <{}>", child.name),
        ));
    }
    Ok(element.text.clone())
}
