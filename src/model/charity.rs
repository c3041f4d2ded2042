use std::fmt;

use indoc::writedoc;

/// A charity from the search service, never persisted beyond the run. The id
/// and name are mandatory in the upstream response; activities and region may
/// legitimately be null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charity {
    pub id: String,
    pub name: String,
    pub activities: Option<String>,
    pub region: Option<String>,
}

impl fmt::Display for Charity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        let id = &self.id;
        let region = self.region.as_deref().unwrap_or("unknown");
        let activities = self.activities.as_deref().unwrap_or("none provided");

        writedoc! {
            f,
            "
            Charity: {name}
            Charity commission id: {id}
            Region: {region}
            Description:
            {activities}"
        }
    }
}
