use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// how a feature's category is read from its GeoJSON properties.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CategoryRule {
    /// every feature of the layer shares one category
    Constant { category: String },
    /// the category is the value of a property
    Property {
        key: String,
        #[serde(default)]
        default: Option<String>,
    },
    /// the category of the first matching rule, comparing case-insensitively.
    /// for example, transit modes from `name` and `route_type`.
    FirstMatch {
        rules: Vec<MatchRule>,
        #[serde(default)]
        default: Option<String>,
    },
}

/// matches when the property `key` equals `equals` or contains `contains`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MatchRule {
    pub key: String,
    #[serde(default)]
    pub equals: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
    pub category: String,
}

impl MatchRule {
    pub fn validate(&self) -> Result<(), String> {
        match (&self.equals, &self.contains) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(format!(
                "rule for category '{}' must set exactly one of 'equals' or 'contains'",
                self.category
            )),
        }
    }

    fn matches(&self, properties: &Map<String, Value>) -> bool {
        let value = match properties.get(&self.key).and_then(property_string) {
            Some(v) => v.to_lowercase(),
            None => return false,
        };
        match (&self.equals, &self.contains) {
            (Some(e), _) => value == e.to_lowercase(),
            (None, Some(c)) => value.contains(&c.to_lowercase()),
            (None, None) => false,
        }
    }
}

impl CategoryRule {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            CategoryRule::FirstMatch { rules, .. } => {
                if rules.is_empty() {
                    return Err(String::from("first_match requires at least one rule"));
                }
                rules.iter().try_for_each(|r| r.validate())
            }
            _ => Ok(()),
        }
    }

    /// the category of a feature, or None when the feature should be skipped.
    pub fn read(&self, properties: &Map<String, Value>) -> Option<String> {
        match self {
            CategoryRule::Constant { category } => Some(category.clone()),
            CategoryRule::Property { key, default } => properties
                .get(key)
                .and_then(property_string)
                .or_else(|| default.clone()),
            CategoryRule::FirstMatch { rules, default } => rules
                .iter()
                .find(|r| r.matches(properties))
                .map(|r| r.category.clone())
                .or_else(|| default.clone()),
        }
    }
}

/// a property rendered as a string. null, arrays and objects have no string value.
pub fn property_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transit_rule() -> CategoryRule {
        let config = json!({
            "type": "first_match",
            "rules": [
                { "key": "name", "contains": "s-bahn", "category": "S-Bahn" },
                { "key": "route_type", "equals": "train", "category": "S-Bahn" },
                { "key": "name", "contains": "u-bahn", "category": "U-Bahn" },
                { "key": "route_type", "equals": "subway", "category": "U-Bahn" },
                { "key": "route_type", "equals": "tram", "category": "Tram" },
                { "key": "route_type", "equals": "bus", "category": "Bus" }
            ],
            "default": "Other"
        });
        serde_json::from_value(config).expect("rule deserializes")
    }

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("test properties must be an object"),
        }
    }

    #[test]
    fn test_first_match_order_and_case() {
        let rule = transit_rule();
        rule.validate().expect("rule is valid");
        let cases = [
            (json!({"name": "S-Bahn Stadtmitte", "route_type": "bus"}), "S-Bahn"),
            (json!({"name": "Hauptbahnhof", "route_type": "Subway"}), "U-Bahn"),
            (json!({"name": "Charlottenplatz", "route_type": "tram"}), "Tram"),
            (json!({"route_type": "ferry"}), "Other"),
            (json!({}), "Other"),
        ];
        for (p, expected) in cases {
            assert_eq!(rule.read(&props(p)).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_property_rule() {
        let rule = CategoryRule::Property {
            key: String::from("amenity"),
            default: None,
        };
        assert_eq!(
            rule.read(&props(json!({"amenity": "pharmacy"}))).as_deref(),
            Some("pharmacy")
        );
        assert_eq!(rule.read(&props(json!({"amenity": null}))), None);
        assert_eq!(
            rule.read(&props(json!({"amenity": 3}))).as_deref(),
            Some("3")
        );
    }

    #[test]
    fn test_invalid_match_rule() {
        let rule = MatchRule {
            key: String::from("shop"),
            equals: Some(String::from("bakery")),
            contains: Some(String::from("bake")),
            category: String::from("food"),
        };
        assert!(rule.validate().is_err());
    }
}
