use crate::render::Entry;

/// One reference in a `/passages` response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PassageJson {
    Passage { reference: String, body: String },
    Invalid { invalid: String, reason: String },
}

#[derive(Debug, Serialize)]
pub struct PassagesJson {
    pub count: usize,
    pub results: Vec<PassageJson>,
}

impl PassagesJson {
    pub fn from_entries(entries: Vec<Entry>) -> PassagesJson {
        let results = entries
            .into_iter()
            .map(|entry| match entry {
                Ok(passage) => PassageJson::Passage {
                    reference: passage.label,
                    body: passage.body,
                },
                Err(bad) => PassageJson::Invalid {
                    invalid: bad.raw,
                    reason: bad.error.to_string(),
                },
            })
            .collect::<Vec<_>>();
        PassagesJson {
            count: results.len(),
            results,
        }
    }
}
