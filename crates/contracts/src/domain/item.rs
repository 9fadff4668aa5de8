use serde::{Deserialize, Serialize};

/// Reference item from the Protheus ERP catalog (SB1010), read-only snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub code: String,
    pub description: String,
}

impl Item {
    /// ERP CHAR columns arrive padded, trim both ends
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into().trim().to_string(),
            description: description.into().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_char_padding() {
        let item = Item::new("  PROD0070   ", " BOBINA 50KG  ");
        assert_eq!(item.code, "PROD0070");
        assert_eq!(item.description, "BOBINA 50KG");
    }

    #[test]
    fn wire_format_is_camel_case() {
        let item = Item::new("INTE9005", "INTERMEDIARIO 9005");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["code"], "INTE9005");
        assert_eq!(json["description"], "INTERMEDIARIO 9005");
    }
}
