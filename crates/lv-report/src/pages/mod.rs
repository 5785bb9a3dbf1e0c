//! Page builders.
//!
//! Each builder mounts its template, fills the text slots and creates its
//! charts through a [`PageCtx`](crate::context::PageCtx). Builders return
//! errors instead of handling them; the controller owns failure policy.

pub mod library;
pub mod overview;

/// Integer with thousands separators: `22000` -> `"22,000"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
