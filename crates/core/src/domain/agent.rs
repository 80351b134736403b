use std::fmt;

use serde::{Deserialize, Serialize};

const FAST_SPEED_TAG: &str = "fast";
const PLACEHOLDER_LOGO: &str = "/agents/placeholder.png";
const TRACKING_SOURCE: &str = "xfinds";
const TRACKING_MEDIUM: &str = "bridge";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AgentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A reseller profile from the agent directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// Rating on a 0-5 scale.
    pub rating: f64,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub speed_tag: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub site_url: String,
    /// Free-form promotional text, never parsed into a discount value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_text: Option<String>,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>, rating: f64) -> Self {
        let id = id.into();
        Self {
            slug: id.0.clone(),
            id,
            name: name.into(),
            rating,
            badges: Vec::new(),
            speed_tag: String::new(),
            logo: String::new(),
            site_url: String::new(),
            promo_text: None,
            recommended: false,
            notes: None,
        }
    }

    pub fn with_speed_tag(mut self, speed_tag: impl Into<String>) -> Self {
        self.speed_tag = speed_tag.into();
        self
    }

    pub fn with_promo(mut self, promo_text: impl Into<String>) -> Self {
        self.promo_text = Some(promo_text.into());
        self
    }

    pub fn has_promo(&self) -> bool {
        self.promo_text.as_deref().is_some_and(|text| !text.is_empty())
    }

    /// Exact, case-sensitive match on the `fast` speed tag.
    pub fn is_fast(&self) -> bool {
        self.speed_tag == FAST_SPEED_TAG
    }

    pub fn logo_path(&self) -> &str {
        if self.logo.starts_with('/') {
            &self.logo
        } else {
            PLACEHOLDER_LOGO
        }
    }

    /// Outbound link tagged with the storefront's referral parameters.
    ///
    /// Absolute product links get the tracking keys set in place, keeping
    /// other query parameters and the fragment. Relative links and the agent
    /// site fallback get the keys appended as-is.
    pub fn tracking_url(&self, link: Option<&str>) -> String {
        let params = [
            ("source", TRACKING_SOURCE),
            ("utm_medium", TRACKING_MEDIUM),
            ("utm_agent", self.id.as_str()),
        ];
        match link.filter(|value| !value.is_empty()) {
            Some(link) if link.starts_with("http") => set_query_params(link, &params),
            Some(link) => append_query_params(link, &params),
            None => append_query_params(&self.site_url, &params),
        }
    }
}

/// First agent in directory order with a matching id.
pub fn find_agent<'a>(agents: &'a [Agent], id: &AgentId) -> Option<&'a Agent> {
    agents.iter().find(|agent| agent.id == *id)
}

fn append_query_params(base: &str, params: &[(&str, &str)]) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{}", encode_pairs(params.iter().copied()))
}

/// Sets each key on the query: the first existing occurrence takes the new
/// value and later duplicates are dropped, a missing key is appended.
fn set_query_params(base: &str, params: &[(&str, &str)]) -> String {
    let (without_fragment, fragment) = match base.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (base, None),
    };
    let (path, query) = without_fragment.split_once('?').unwrap_or((without_fragment, ""));

    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    for (name, value) in params {
        match pairs.iter().position(|(key, _)| key == name) {
            Some(first) => {
                pairs[first].1 = (*value).to_owned();
                let mut index = 0;
                pairs.retain(|(key, _)| {
                    let keep = index <= first || key != name;
                    index += 1;
                    keep
                });
            }
            None => pairs.push(((*name).to_owned(), (*value).to_owned())),
        }
    }

    let query = encode_pairs(pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())));
    let mut url = format!("{path}?{query}");
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
