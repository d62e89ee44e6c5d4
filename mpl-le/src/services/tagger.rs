//! Implicit tag inference
//!
//! Patch and bank names tend to encode the sound category ("FatBass",
//! "Lead Stack 2"), so import derives a starting tag set from them. Pure
//! function over the names; users refine tags afterwards.

/// Keyword table: case-insensitive substring match in either name -> tag.
/// Order here is the order tags appear in.
const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("bass", "bass"),
    ("lead", "lead"),
    ("pad", "pad"),
    ("string", "strings"),
    ("pluck", "pluck"),
];

/// Derive implicit tags from a patch name and its bank's name
pub fn implicit_tags(patch_name: &str, bank_name: &str) -> Vec<String> {
    let patch = patch_name.to_lowercase();
    let bank = bank_name.to_lowercase();

    TAG_KEYWORDS
        .iter()
        .filter(|(keyword, _)| patch.contains(keyword) || bank.contains(keyword))
        .map(|(_, tag)| tag.to_string())
        .collect()
}
