//! Sample entry selection

/// Archive directory holding sample payloads
pub const SAMPLE_NAMESPACE: &str = "SampleData/";

/// True for entries under the sample namespace that are not directory markers
pub fn is_sample(path: &str) -> bool {
    path.starts_with(SAMPLE_NAMESPACE) && path.len() > SAMPLE_NAMESPACE.len() && !path.ends_with('/')
}

/// Sample entries in listing order
pub fn sample_entries<'a, I>(entries: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    entries.into_iter().filter(|path| is_sample(path)).collect()
}
