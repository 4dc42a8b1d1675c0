/// Document store collaborator. The core only ever needs a retrievable URL
/// for a stored path; upload mechanics live elsewhere.
pub trait DocumentStore {
    fn url(&self, path: &str) -> String;
}

pub struct LocalDocumentStore {
    base_url: String,
}

impl LocalDocumentStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl DocumentStore for LocalDocumentStore {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
