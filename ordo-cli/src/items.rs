/// Item loading and `name.price.suffix` parsing.
///
/// Each item is described by a file-name style spec such as
/// `nike_airforce44.250.png`. The price part is optional; when it's missing
/// the user is asked for it before ranking starts.
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The spec exactly as given, used for de-duplication.
    pub spec: String,
    pub title: String,
    /// Listed price, if the spec carried one.
    pub price: Option<u64>,
}

impl Item {
    /// Listed price as a float. Only valid once every price is known.
    pub fn listed_price(&self) -> f64 {
        self.price.map(|p| p as f64).unwrap_or(f64::NAN)
    }
}

/// Parse a single spec. The price is the second-to-last dot-separated part and
/// must be all digits; everything before it is the title.
pub fn parse_item_spec(spec: &str) -> Item {
    let spec = spec.trim();
    let mut parts = spec.rsplitn(3, '.');
    let suffix = parts.next();
    let price_part = parts.next();
    let title_part = parts.next();

    match (suffix, price_part, title_part) {
        (Some(_), Some(price), Some(title))
            if !price.is_empty() && price.chars().all(|c| c.is_ascii_digit()) =>
        {
            Item {
                spec: spec.to_string(),
                title: title.to_string(),
                price: price.parse().ok(),
            }
        }
        _ => {
            // No usable price: drop the suffix if there is one.
            let title = match spec.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem,
                _ => spec,
            };
            Item {
                spec: spec.to_string(),
                title: title.to_string(),
                price: None,
            }
        }
    }
}

/// Parse a string as either a JSON array of strings or plain text (one item per line).
pub fn parse_items_from_str(content: &str) -> Result<Vec<String>, serde_json::Error> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)?;
        Ok(items.into_iter().filter(|s| !s.trim().is_empty()).collect())
    } else {
        Ok(trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

/// Parse specs into items, keeping only the first occurrence of each spec.
pub fn build_items(specs: &[String]) -> Vec<Item> {
    let mut seen = HashSet::new();
    specs
        .iter()
        .map(|s| s.trim())
        .filter(|s| seen.insert(s.to_string()))
        .map(parse_item_spec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_with_price() {
        let item = parse_item_spec("nike_airforce44.250.png");
        assert_eq!(item.title, "nike_airforce44");
        assert_eq!(item.price, Some(250));
        assert_eq!(item.listed_price(), 250.0);
    }

    #[test]
    fn test_spec_title_with_dots() {
        let item = parse_item_spec("coat.v2.99.jpg");
        assert_eq!(item.title, "coat.v2");
        assert_eq!(item.price, Some(99));
    }

    #[test]
    fn test_spec_without_price() {
        let item = parse_item_spec("skirt.png");
        assert_eq!(item.title, "skirt");
        assert_eq!(item.price, None);

        let item = parse_item_spec("skirt.blue.png");
        assert_eq!(item.title, "skirt.blue");
        assert_eq!(item.price, None);

        let item = parse_item_spec("plain");
        assert_eq!(item.title, "plain");
        assert_eq!(item.price, None);
        assert!(item.listed_price().is_nan());
    }

    #[test]
    fn test_spec_rejects_signed_or_decimal_price() {
        assert_eq!(parse_item_spec("hat.-5.png").price, None);
        assert_eq!(parse_item_spec("hat.5.5.png").price, Some(5));
        assert_eq!(parse_item_spec("hat.5.5.png").title, "hat.5");
    }

    #[test]
    fn test_parse_lines_and_json() {
        let lines = parse_items_from_str("a.1.png\n\n  b.2.png  \n").unwrap();
        assert_eq!(lines, vec!["a.1.png", "b.2.png"]);

        let json = parse_items_from_str(r#"["a.1.png", " ", "b.2.png"]"#).unwrap();
        assert_eq!(json, vec!["a.1.png", "b.2.png"]);

        assert!(parse_items_from_str("[not json").is_err());
    }

    #[test]
    fn test_build_items_drops_duplicates() {
        let specs = vec![
            "a.1.png".to_string(),
            "b.2.png".to_string(),
            " a.1.png".to_string(),
        ];
        let items = build_items(&specs);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "b");
    }
}
