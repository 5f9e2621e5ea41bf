//! Opaque block-definition document handed to the external renderer.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
/// Reasons a text cannot become a [`BlockDocument`].
pub enum BlockDocumentError {
    /// The text is not JSON.
    #[error("{0}")]
    Syntax(#[from] serde_json::Error),
    /// The JSON is a scalar.
    #[error("block document must be a JSON array or object")]
    NotContainer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
/// JSON array or object describing renderable message content.
///
/// The contents belong to the renderer and are never interpreted here.
pub struct BlockDocument(Value);

impl BlockDocument {
    /// Wraps `value` when it is an array or object.
    ///
    /// # Errors
    ///
    /// Returns [`BlockDocumentError::NotContainer`] for scalars and `null`.
    pub fn from_value(value: Value) -> Result<Self, BlockDocumentError> {
        if value.is_array() || value.is_object() {
            Ok(Self(value))
        } else {
            Err(BlockDocumentError::NotContainer)
        }
    }

    /// Parses editor text into a document.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not JSON or not an array/object.
    pub fn parse(text: &str) -> Result<Self, BlockDocumentError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Borrows the raw JSON.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns the raw JSON.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Renders the document as two-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when JSON encoding fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }
}

impl<'de> Deserialize<'de> for BlockDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

/// Sample document shown when nothing is persisted.
pub fn sample_blocks() -> BlockDocument {
    BlockDocument(json!([
        {
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": "Hello, Assistant to the Regional Manager Dwight! *Michael Scott* wants to know where you'd like to take the Paper Company investors to dinner tonight.\n\n *Please select a restaurant:*"
            }
        },
        {"type": "divider"},
        {
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": "*Farmhouse Thai Cuisine*\n:star::star::star::star: 1528 reviews\n They do have some vegan options, like the roti and curry, plus they have a ton of salad stuff and noodles can be ordered without meat!! They have something for everyone here"
            },
            "accessory": {
                "type": "image",
                "image_url": "https://s3-media3.fl.yelpcdn.com/bphoto/c7ed05m9lC2EmA3Aruue7A/o.jpg",
                "alt_text": "alt text for image"
            }
        },
        {"type": "divider"},
        {
            "type": "actions",
            "elements": [
                {
                    "type": "button",
                    "text": {"type": "plain_text", "text": "Farmhouse", "emoji": true},
                    "value": "click_me_123"
                },
                {
                    "type": "button",
                    "text": {"type": "plain_text", "text": "Kin Khao", "emoji": true},
                    "value": "click_me_123",
                    "url": "https://google.com"
                }
            ]
        }
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_and_objects_are_accepted() {
        assert!(BlockDocument::parse("[]").is_ok());
        assert!(BlockDocument::parse("{\"blocks\": []}").is_ok());
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(matches!(
            BlockDocument::parse("42"),
            Err(BlockDocumentError::NotContainer)
        ));
        assert!(matches!(
            BlockDocument::parse("[1,"),
            Err(BlockDocumentError::Syntax(_))
        ));
    }

    #[test]
    fn serde_goes_through_the_same_gate() {
        assert!(serde_json::from_str::<BlockDocument>("\"text\"").is_err());
        let doc: BlockDocument = serde_json::from_str("[{\"type\":\"divider\"}]").expect("decode");
        assert_eq!(
            serde_json::to_string(&doc).expect("encode"),
            "[{\"type\":\"divider\"}]"
        );
    }

    #[test]
    fn sample_is_a_non_empty_array() {
        let sample = sample_blocks();
        assert!(sample.as_value().as_array().is_some_and(|blocks| !blocks.is_empty()));
    }
}
