//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use std::io::Write;
use std::sync::Once;
use tempfile::NamedTempFile;

static INIT: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Write definition YAML to a temporary file kept alive by the returned handle
pub fn definition_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

pub const BLOG_FILTERS: &str = r#"
filter:
  name: PostFilter
  model_fields: [title, views, created_at]
  search:
    model_fields: [title, body]
  fields:
    - title
    - name: views__gte
      type: integer
    - id__in
    - deleted_at__isnull
    - name: author
      nested: AuthorFilter
---
filter:
  name: AuthorFilter
  fields:
    - name
    - name: count__gte
      type: integer
    - name: company
      nested: CompanyFilter
---
filter:
  name: CompanyFilter
  fields:
    - country
"#;
