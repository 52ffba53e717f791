//! Recoloring of per-class placemarks in a KML overlay.
//!
//! The template is read as a stream of namespace-resolved events. For every `Placemark`
//! whose class has a coefficient in the [`SettingsModel`], the content of its first
//! `Style/PolyStyle/color` child is replaced by the color from [`crate::color::channel`].
//! The output is assembled by splicing those replacements into the original bytes, so
//! declarations, comments, whitespace, namespace prefixes and unrelated elements come
//! out exactly as they went in.
use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::{debug, info};

use crate::color::{channel, ChannelValue};
use crate::error::{Error, Result};
use crate::landuse::LandUseClass;
use crate::overlay::events::{EventSink, OverlayEvent, SkipReason, TransformSummary};
use crate::overlay::{OverlayDocument, TransformConfig};
use crate::settings::SettingsModel;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Element on the open-element stack.
enum Frame {
    Placemark,
    Style,
    PolyStyle,
    /// A color element whose content, starting at `content_start`, becomes `color`.
    Recoloring { content_start: usize, color: String },
    Other,
}

struct Recolor {
    class: LandUseClass,
    coefficient: f64,
    channel: ChannelValue,
    color: String,
}

struct OpenPlacemark {
    index: usize,
    class: Option<String>,
    target: std::result::Result<Recolor, SkipReason>,
    recolored: bool,
}

impl OpenPlacemark {
    fn into_event(self) -> OverlayEvent {
        match self.target {
            Ok(recolor) if self.recolored => OverlayEvent::PlacemarkRecolored {
                index: self.index,
                class: recolor.class,
                coefficient: recolor.coefficient,
                channel: recolor.channel,
                color: recolor.color,
            },
            Ok(_) => OverlayEvent::PlacemarkSkipped {
                index: self.index,
                class: self.class,
                reason: SkipReason::NoColorElement,
            },
            Err(reason) => OverlayEvent::PlacemarkSkipped {
                index: self.index,
                class: self.class,
                reason,
            },
        }
    }
}

/// Rewrites overlay colors for a given [`SettingsModel`]. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct OverlayTransformer {
    pub config: TransformConfig,
}

impl OverlayTransformer {
    pub fn try_new(config: TransformConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: TransformConfig) -> Self {
        debug_assert!(
            !config.class_attribute.is_empty(),
            "class_attribute must not be empty"
        );
        Self { config }
    }

    /// Produce a recolored copy of `template`.
    pub fn transform(
        &self,
        template: &OverlayDocument,
        settings: &SettingsModel,
    ) -> Result<OverlayDocument> {
        self.transform_with_events(template, settings, &mut ())
    }

    /// Like [`Self::transform`], reporting every placemark to `sink`.
    ///
    /// Events are only delivered when the whole document was transformed successfully.
    pub fn transform_with_events<S>(
        &self,
        template: &OverlayDocument,
        settings: &SettingsModel,
        sink: &mut S,
    ) -> Result<OverlayDocument>
    where
        S: EventSink + ?Sized,
    {
        let bytes = template.as_bytes();
        let bom = if bytes.starts_with(UTF8_BOM) {
            UTF8_BOM.len()
        } else {
            0
        };
        // All offsets below are relative to `input`, which excludes the byte-order mark.
        let input = &bytes[bom..];
        let mut reader = NsReader::from_reader(input);

        let mut stack: Vec<Frame> = Vec::new();
        let mut placemarks: Vec<OpenPlacemark> = Vec::new();
        let mut edits: Vec<(Range<usize>, Vec<u8>)> = Vec::new();
        let mut events: Vec<OverlayEvent> = Vec::new();
        let mut placemark_count = 0usize;
        let mut saw_root = false;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let in_namespace = self.is_bound(&resolved);
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    open_top_level(&stack, &mut saw_root)?;
                    let frame = match e.local_name().as_ref() {
                        b"Placemark" if in_namespace => {
                            let placemark =
                                self.open_placemark(&e, placemark_count, settings)?;
                            placemarks.push(placemark);
                            placemark_count += 1;
                            Frame::Placemark
                        }
                        b"Style" if in_namespace => Frame::Style,
                        b"PolyStyle" if in_namespace => Frame::PolyStyle,
                        b"color" if in_namespace => {
                            match claim_color(&stack, &mut placemarks) {
                                Some(color) => Frame::Recoloring {
                                    content_start: end,
                                    color,
                                },
                                None => Frame::Other,
                            }
                        }
                        _ => Frame::Other,
                    };
                    stack.push(frame);
                }
                Event::Empty(e) => {
                    open_top_level(&stack, &mut saw_root)?;
                    match e.local_name().as_ref() {
                        b"Placemark" if in_namespace => {
                            let placemark =
                                self.open_placemark(&e, placemark_count, settings)?;
                            placemark_count += 1;
                            events.push(placemark.into_event());
                        }
                        b"color" if in_namespace => {
                            if let Some(color) = claim_color(&stack, &mut placemarks) {
                                let start = tag_start(input, end)?;
                                let expanded = expand_empty(&input[start..end], &e, &color);
                                edits.push((start..end, expanded));
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(_) => match stack.pop() {
                    Some(Frame::Placemark) => {
                        if let Some(placemark) = placemarks.pop() {
                            events.push(placemark.into_event());
                        }
                    }
                    Some(Frame::Recoloring {
                        content_start,
                        color,
                    }) => {
                        let content_end = tag_start(input, end)?;
                        edits.push((content_start..content_end, color.into_bytes()));
                    }
                    Some(_) => {}
                    None => return Err(Error::Template("unmatched end tag".into())),
                },
                Event::Text(t) if stack.is_empty() => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(Error::Template("text outside the root element".into()));
                    }
                }
                Event::CData(_) if stack.is_empty() => {
                    return Err(Error::Template("CDATA outside the root element".into()));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(Error::Template("document has no root element".into()));
        }
        if !stack.is_empty() {
            return Err(Error::Template(format!(
                "unexpected end of document with {} unclosed element(s)",
                stack.len()
            )));
        }

        let mut output = Vec::with_capacity(bytes.len());
        output.extend_from_slice(&bytes[..bom]);
        output.extend(splice(input, &edits));

        let mut summary = TransformSummary {
            placemarks: placemark_count,
            ..Default::default()
        };
        for event in events {
            match &event {
                OverlayEvent::PlacemarkRecolored { class, color, .. } => {
                    summary.recolored += 1;
                    debug!(%class, color = color.as_str(), "placemark recolored");
                }
                OverlayEvent::PlacemarkSkipped { index, class, reason } => {
                    summary.skipped += 1;
                    debug!(index, ?class, ?reason, "placemark skipped");
                }
                _ => {}
            }
            sink.send(event);
        }
        info!(
            placemarks = summary.placemarks,
            recolored = summary.recolored,
            skipped = summary.skipped,
            "overlay transformed"
        );
        sink.send(OverlayEvent::TransformFinished { summary });

        Ok(OverlayDocument::new(output))
    }

    fn is_bound(&self, resolved: &ResolveResult<'_>) -> bool {
        matches!(
            resolved,
            ResolveResult::Bound(Namespace(ns)) if *ns == self.config.namespace.as_bytes()
        )
    }

    fn open_placemark(
        &self,
        e: &BytesStart<'_>,
        index: usize,
        settings: &SettingsModel,
    ) -> Result<OpenPlacemark> {
        let class = match e.try_get_attribute(self.config.class_attribute.as_bytes())? {
            Some(attr) => Some(attr.unescape_value()?.into_owned()),
            None => None,
        };

        let target = match class.as_deref() {
            None => Err(SkipReason::MissingClass),
            Some(id) => match LandUseClass::from_id(id) {
                None => Err(SkipReason::UnknownClass),
                Some(class) => match settings.coefficient(class) {
                    None => Err(SkipReason::NoCoefficient),
                    Some(coefficient) => {
                        let channel = channel(coefficient);
                        Ok(Recolor {
                            class,
                            coefficient,
                            channel,
                            color: channel.color_text(),
                        })
                    }
                },
            },
        };

        Ok(OpenPlacemark {
            index,
            class,
            target,
            recolored: false,
        })
    }
}

/// Returns the new color text if the stack sits at `Placemark/Style/PolyStyle` and the
/// enclosing placemark still awaits its color. Marks the placemark as recolored.
fn claim_color(stack: &[Frame], placemarks: &mut [OpenPlacemark]) -> Option<String> {
    if !matches!(stack, [.., Frame::Placemark, Frame::Style, Frame::PolyStyle]) {
        return None;
    }
    let placemark = placemarks.last_mut()?;
    if placemark.recolored {
        return None;
    }
    let color = placemark.target.as_ref().ok()?.color.clone();
    placemark.recolored = true;
    Some(color)
}

/// Marks the root as seen when an element opens at the top level. A second root fails.
fn open_top_level(stack: &[Frame], saw_root: &mut bool) -> Result<()> {
    if !stack.is_empty() {
        return Ok(());
    }
    if *saw_root {
        return Err(Error::Template("more than one root element".into()));
    }
    *saw_root = true;
    Ok(())
}

/// Offset of the `<` opening the tag that ends at `end`. Tags never contain `<`.
fn tag_start(input: &[u8], end: usize) -> Result<usize> {
    input[..end]
        .iter()
        .rposition(|b| *b == b'<')
        .ok_or_else(|| Error::Template(format!("no tag before offset {end}")))
}

/// Turn `<color .../>` into `<color ...>text</color>`, keeping its attributes.
fn expand_empty(tag: &[u8], e: &BytesStart<'_>, color: &str) -> Vec<u8> {
    let open = tag.strip_suffix(b"/>").unwrap_or(tag);
    let name = e.name();
    let mut out = Vec::with_capacity(open.len() + color.len() + name.as_ref().len() + 4);
    out.extend_from_slice(open);
    out.push(b'>');
    out.extend_from_slice(color.as_bytes());
    out.extend_from_slice(b"</");
    out.extend_from_slice(name.as_ref());
    out.push(b'>');
    out
}

fn splice(input: &[u8], edits: &[(Range<usize>, Vec<u8>)]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        output.extend_from_slice(&input[cursor..range.start]);
        output.extend_from_slice(replacement);
        cursor = range.end;
    }
    output.extend_from_slice(&input[cursor..]);
    output
}

/// Transform with the default [`TransformConfig`].
pub fn transform(template: &OverlayDocument, settings: &SettingsModel) -> Result<OverlayDocument> {
    OverlayTransformer::default().transform(template, settings)
}
