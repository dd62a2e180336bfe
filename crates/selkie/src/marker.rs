//! Edge marker types. Rendering the symbols is a presentational concern; the core only
//! resolves names so unknown values can be reported and omitted.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorChannel, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerType {
    #[serde(rename = "arrow")]
    Arrow,
    #[serde(rename = "arrowclosed")]
    ArrowClosed,
}

impl MarkerType {
    /// Resolves a marker name. Unknown names report a recoverable error and yield `None`;
    /// the affected visual is simply omitted.
    pub fn resolve(value: &str, errors: &ErrorChannel) -> Option<MarkerType> {
        match value {
            "arrow" => Some(MarkerType::Arrow),
            "arrowclosed" => Some(MarkerType::ArrowClosed),
            other => {
                errors.report(
                    ErrorCode::UnknownMarker,
                    &format!("marker type \"{other}\" is not recognized"),
                );
                None
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerType::Arrow => "arrow",
            MarkerType::ArrowClosed => "arrowclosed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn resolve_known_markers() {
        let errors = ErrorChannel::default();
        assert_eq!(
            MarkerType::resolve("arrow", &errors),
            Some(MarkerType::Arrow)
        );
        assert_eq!(
            MarkerType::resolve("arrowclosed", &errors),
            Some(MarkerType::ArrowClosed)
        );
    }

    #[test]
    fn unknown_marker_reports_code_009_and_is_omitted() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let errors = ErrorChannel::new(Box::new(move |code, _msg| {
            sink.borrow_mut().push(code.code().to_string());
        }));

        assert_eq!(MarkerType::resolve("fancy", &errors), None);
        assert_eq!(seen.borrow().as_slice(), ["009"]);
    }
}
