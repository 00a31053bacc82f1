use crate::error::Error;

/// Paging parameters for the list endpoints. An empty cursor and a zero limit
/// are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(cursor) = self.cursor.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("cursor", cursor.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Identifies a provisioner by id or by name. When both are set the id wins.
///
/// By id the request goes to `/admin/provisioners/id?id=<id>`; by name to
/// `/admin/provisioners/<name>`. A provisioner named `id` therefore collides
/// with the by-id endpoint: selecting it by name sends `/admin/provisioners/id`
/// with no `id` query, which the CA treats as a by-id lookup. Select such a
/// provisioner by its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionerSelector {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProvisionerTarget<'a> {
    Id(&'a str),
    Name(&'a str),
}

impl ProvisionerSelector {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn target(&self) -> Result<ProvisionerTarget<'_>, Error> {
        let id = self.id.as_deref().filter(|id| !id.is_empty());
        let name = self.name.as_deref().filter(|name| !name.is_empty());
        match (id, name) {
            (Some(id), _) => Ok(ProvisionerTarget::Id(id)),
            (None, Some(name)) => Ok(ProvisionerTarget::Name(name)),
            (None, None) => Err(Error::RequestBuild(
                "provisioner selector needs either an id or a name".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_options_skip_empty_values() {
        assert!(ListOptions::new().to_query_pairs().is_empty());
        assert!(ListOptions::new()
            .with_cursor("")
            .with_limit(0)
            .to_query_pairs()
            .is_empty());
        assert_eq!(
            ListOptions::new()
                .with_cursor("abc")
                .with_limit(100)
                .to_query_pairs(),
            vec![("cursor", "abc".to_string()), ("limit", "100".to_string())]
        );
    }

    #[test]
    fn selector_prefers_id() {
        let selector = ProvisionerSelector::by_name("acme").with_id("p-1");
        assert_eq!(selector.target().expect("target"), ProvisionerTarget::Id("p-1"));
    }

    #[test]
    fn selector_treats_empty_strings_as_unset() {
        let selector = ProvisionerSelector::by_id("").with_name("acme");
        assert_eq!(
            selector.target().expect("target"),
            ProvisionerTarget::Name("acme")
        );

        let err = ProvisionerSelector::by_id("")
            .with_name("")
            .target()
            .expect_err("error");
        assert!(matches!(err, Error::RequestBuild(_)));
        assert!(ProvisionerSelector::default().target().is_err());
    }
}
