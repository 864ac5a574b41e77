/// Substring deny-list applied to pod names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    members: Vec<String>,
}

impl ExclusionSet {
    pub const DEFAULT_MEMBERS: [&'static str; 7] = [
        "opensearch",
        "prometheus",
        "otelcol",
        "loadgenerator",
        "jaeger",
        "grafana",
        "featureflagservice",
    ];

    /// Blank members are dropped; an empty substring would match every name.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members = members
            .into_iter()
            .map(|member| member.as_ref().trim().to_string())
            .filter(|member| !member.is_empty())
            .collect();
        Self { members }
    }

    pub fn excludes(&self, name: &str) -> bool {
        self.members.iter().any(|member| name.contains(member.as_str()))
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MEMBERS)
    }
}
