use tracing::debug;

pub const PROFILE_OVERVIEW: &str = "profile-overview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub section: String,
    /// Fragment to push onto the history, e.g. `#events`.
    pub hash: String,
}

/// Hash-addressed sidebar sections of the profile page.
#[derive(Debug, Clone)]
pub struct ProfileRouter {
    sections: Vec<String>,
    active: String,
}

impl ProfileRouter {
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: Vec<String> = vec![PROFILE_OVERVIEW.to_string()];
        for section in sections {
            let section = section.into();
            if !known.contains(&section) {
                known.push(section);
            }
        }
        Self {
            sections: known,
            active: PROFILE_OVERVIEW.to_string(),
        }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    /// Known section for `hash` (leading `#` optional), else the overview.
    pub fn resolve<'a>(&'a self, hash: &str) -> &'a str {
        let id = hash.strip_prefix('#').unwrap_or(hash);
        self.sections
            .iter()
            .find(|section| section.as_str() == id)
            .map(String::as_str)
            .unwrap_or(PROFILE_OVERVIEW)
    }

    pub fn switch_to(&mut self, section: &str) -> Route {
        let section = self.resolve(section).to_string();
        debug!(section = %section, "profile section switched");
        self.active = section.clone();
        Route {
            hash: format!("#{section}"),
            section,
        }
    }

    /// Initial load and back/forward navigation.
    pub fn on_hash_change(&mut self, hash: &str) -> Route {
        self.switch_to(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_or_empty_hash_goes_to_overview() {
        let mut router = ProfileRouter::new(["biography", "events"]);
        assert_eq!(router.on_hash_change("").section, PROFILE_OVERVIEW);
        assert_eq!(router.on_hash_change("#missing").section, PROFILE_OVERVIEW);
    }

    #[test]
    fn switching_updates_active_and_hash() {
        let mut router = ProfileRouter::new(["biography", "events"]);
        let route = router.switch_to("events");
        assert_eq!(route.hash, "#events");
        assert_eq!(router.active(), "events");
        assert_eq!(router.on_hash_change("#biography").section, "biography");
    }

    #[test]
    fn overview_is_always_known_once() {
        let router = ProfileRouter::new([PROFILE_OVERVIEW, "events"]);
        assert_eq!(router.sections(), [PROFILE_OVERVIEW, "events"]);
    }
}
