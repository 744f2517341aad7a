//! Text rendering of a [`FragmentGroup`].
//!
//! ```text
//! ''' a.ts '''
//! class Foo {
//!     ...
//!     ### lines 2 - 4
//!     bar() { return 1; }
//!
//!     ### line 6
//!     baz() { return 2; }
//!
//! ### lines 10 - 12
//! function helper() {}
//! ```

use super::grouper::{ContainerKey, Fragment, FragmentGroup};

/// Placeholder printed between a container header and its members.
pub const ELLIPSIS: &str = "    ...";

/// Render `group`. Pure; equal input always gives byte-identical output.
#[must_use]
pub fn serialize(group: &FragmentGroup) -> String {
    let mut out = String::new();
    for file in group.files() {
        out.push_str(&format!("''' {} '''\n", file.path));
        for container in &file.containers {
            match &container.key {
                ContainerKey::Standalone(_) => {
                    if let Some(fragment) = container.fragments.first() {
                        out.push_str(&format!(
                            "### lines {} - {}\n{}\n\n",
                            fragment.start_line, fragment.end_line, fragment.code
                        ));
                    }
                }
                ContainerKey::Header(header) => {
                    out.push_str(header);
                    out.push('\n');
                    out.push_str(ELLIPSIS);
                    out.push('\n');
                    for fragment in &container.fragments {
                        out.push_str(&format!("    {}\n", line_marker(fragment)));
                        out.push_str(&format!("    {}\n\n", fragment.code));
                    }
                }
            }
        }
    }
    out.trim_end().to_string()
}

fn line_marker(fragment: &Fragment) -> String {
    if fragment.start_line == fragment.end_line {
        format!("### line {}", fragment.start_line)
    } else {
        format!("### lines {} - {}", fragment.start_line, fragment.end_line)
    }
}
