//! Geographic anchor of a model document.
//!
//! KML documents exported with a 3D model carry a `Location` with `latitude` and
//! `longitude` elements. Only the first of each is read; namespaces are ignored.
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

use crate::error::Result;
use crate::overlay::OverlayDocument;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Copy)]
enum Field {
    Latitude,
    Longitude,
}

/// Read the first `latitude`/`longitude` pair. Missing or non-numeric values yield `None`.
pub fn model_location(document: &OverlayDocument) -> Result<Option<ModelLocation>> {
    let mut reader = Reader::from_reader(document.as_bytes());

    let mut latitude: Option<String> = None;
    let mut longitude: Option<String> = None;
    let mut current: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                current = match e.local_name().as_ref() {
                    b"latitude" if latitude.is_none() => Some(Field::Latitude),
                    b"longitude" if longitude.is_none() => Some(Field::Longitude),
                    _ => None,
                };
                match current {
                    Some(Field::Latitude) => latitude = Some(String::new()),
                    Some(Field::Longitude) => longitude = Some(String::new()),
                    None => {}
                }
            }
            Event::Text(t) => {
                let slot = match current {
                    Some(Field::Latitude) => latitude.as_mut(),
                    Some(Field::Longitude) => longitude.as_mut(),
                    None => None,
                };
                if let Some(slot) = slot {
                    slot.push_str(&t.unescape()?);
                }
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }

    let parse = |name: &str, text: Option<String>| -> Option<f64> {
        let text = text?;
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                warn!(field = name, text = text.as_str(), "unreadable model coordinate");
                None
            }
        }
    };

    let latitude = parse("latitude", latitude);
    let longitude = parse("longitude", longitude);
    Ok(latitude
        .zip(longitude)
        .map(|(latitude, longitude)| ModelLocation {
            latitude,
            longitude,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_location() {
        let doc = OverlayDocument::from(
            r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Placemark><Model><Location>
                <longitude>-122.4194</longitude>
                <latitude> 37.7749 </latitude>
                <altitude>0</altitude>
            </Location></Model></Placemark>
            <Placemark><Model><Location><longitude>1</longitude><latitude>2</latitude></Location></Model></Placemark></kml>"#,
        );
        assert_eq!(
            model_location(&doc).unwrap(),
            Some(ModelLocation {
                latitude: 37.7749,
                longitude: -122.4194
            })
        );
    }

    #[test]
    fn missing_or_non_numeric_coordinates_yield_none() {
        let only_lat = OverlayDocument::from("<kml><latitude>1.5</latitude></kml>");
        assert_eq!(model_location(&only_lat).unwrap(), None);

        let bad = OverlayDocument::from(
            "<kml><latitude>north</latitude><longitude>2</longitude></kml>",
        );
        assert_eq!(model_location(&bad).unwrap(), None);
    }

    #[test]
    fn malformed_markup_is_an_error() {
        let doc = OverlayDocument::from("<kml><latitude>1</longitude></kml>");
        assert!(model_location(&doc).is_err());
    }
}
