use super::highway::Highway;
use cityhex_core::model::LineFeature;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, str::FromStr};

/// decides which line features of the street network are passable on foot.
#[derive(Default, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PassabilityFilter {
    NoFilter,
    #[default]
    WalkableDefault,
    HighwayTags {
        tags: HashSet<Highway>,
    },
}

impl PassabilityFilter {
    pub fn accept(&self, feature: &LineFeature) -> bool {
        use PassabilityFilter as F;
        match self {
            F::NoFilter => true,
            F::WalkableDefault => walkable_default_filter(feature),
            F::HighwayTags { tags } => custom_highway_tag_filter(feature, tags),
        }
    }
}

/// accepts only features whose highway tag is listed. explicit `foot=no` is
/// still rejected.
///
/// # Arguments
///
/// * `feature` - line feature to test
/// * `tags`    - list of [`Highway`] tags that are accepted
///
/// # Returns
///
/// true if the feature has an accepted [`Highway`] tag and is not closed to pedestrians
fn custom_highway_tag_filter(feature: &LineFeature, tags: &HashSet<Highway>) -> bool {
    if matches!(feature.tag("foot"), Some("no")) {
        return false;
    }
    match get_highway_tag(feature) {
        Some(highway) => tags.contains(&highway),
        None => false, // throw out lines without highway tags
    }
}

/// pedestrian allow-list:
///   - `foot=no` is rejected, `foot` in yes|designated|permissive is accepted
///   - motorways are rejected
///   - walk-like highways are accepted
///   - minor roads are accepted unless `access=no`
///
/// # Return
///
/// * true if we accept this feature, false if it does not pass a filter criteria
fn walkable_default_filter(feature: &LineFeature) -> bool {
    match feature.tag("foot") {
        Some("no") => {
            log::debug!("['foot'='no']");
            return false;
        }
        Some("yes") | Some("designated") | Some("permissive") => return true,
        _ => {}
    }

    let highway = match get_highway_tag(feature) {
        Some(h) => h,
        None => {
            log::debug!("no 'highway' tag");
            return false;
        }
    };

    if highway.is_motorway() {
        log::debug!("['highway'~'motorway|motorway_link']");
        return false;
    }
    if highway.is_walk_like() {
        return true;
    }
    if highway.is_minor_road() {
        let access_no = matches!(feature.tag("access"), Some("no"));
        if access_no {
            log::debug!("['access'='no']");
        }
        return !access_no;
    }
    false
}

fn get_highway_tag(feature: &LineFeature) -> Option<Highway> {
    feature.tag("highway").and_then(|v| Highway::from_str(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, MultiLineString};
    use std::collections::HashMap;

    fn feature(tags: &[(&str, &str)]) -> LineFeature {
        let tags: HashMap<String, String> = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];
        LineFeature::new(MultiLineString::new(vec![line]), tags)
    }

    #[test]
    fn test_walkable_default() {
        let f = PassabilityFilter::WalkableDefault;
        assert!(f.accept(&feature(&[("highway", "footway")])));
        assert!(f.accept(&feature(&[("highway", "tertiary")])));
        assert!(f.accept(&feature(&[("highway", "primary_link")])));
        assert!(!f.accept(&feature(&[("highway", "tertiary"), ("access", "no")])));
        assert!(!f.accept(&feature(&[("highway", "motorway")])));
        assert!(!f.accept(&feature(&[("highway", "trunk")])));
        assert!(!f.accept(&feature(&[("highway", "footway"), ("foot", "no")])));
        assert!(f.accept(&feature(&[("highway", "trunk"), ("foot", "designated")])));
        assert!(!f.accept(&feature(&[("building", "yes")])));
    }

    #[test]
    fn test_highway_tags() {
        let f = PassabilityFilter::HighwayTags {
            tags: HashSet::from([Highway::Footway, Highway::Other(String::from("corridor"))]),
        };
        assert!(f.accept(&feature(&[("highway", "footway")])));
        assert!(f.accept(&feature(&[("highway", "corridor")])));
        assert!(!f.accept(&feature(&[("highway", "residential")])));
        assert!(!f.accept(&feature(&[("highway", "footway"), ("foot", "no")])));
    }

    #[test]
    fn test_no_filter() {
        assert!(PassabilityFilter::NoFilter.accept(&feature(&[("highway", "motorway")])));
    }

    #[test]
    fn test_deserialize_tagged() {
        let json = r#"{"type": "highway_tags", "tags": ["footway", "path"]}"#;
        let f: PassabilityFilter = serde_json::from_str(json).expect("valid filter json");
        match f {
            PassabilityFilter::HighwayTags { tags } => {
                assert!(tags.contains(&Highway::Footway));
                assert!(tags.contains(&Highway::Path));
            }
            other => panic!("expected highway_tags, found {other:?}"),
        }
    }
}
