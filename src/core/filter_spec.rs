/*
 * Encodes a list of `Filter`s into the packed layout the native dialog's
 * "set file types" call reads: a table of (name, spec) string references in
 * input order, plus one UTF-16 region holding each display name and its
 * `*.ext` spec string, null-terminated and written back to back.
 *
 * The region is sized exactly in a first pass and filled in a second, so no
 * offset handed out during the fill can be invalidated by a reallocation.
 * Once built, a `PackedFilterBuffer` never moves its text; native pointers
 * derived from it stay valid for as long as the buffer is borrowed.
 */
use crate::core::filter::Filter;

const SPEC_SEPARATOR: char = ';';
const NUL: u16 = 0;

/// Offsets (in UTF-16 units) of one filter's strings inside the text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpecEntry {
    pub name_offset: usize,
    pub spec_offset: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PackedFilterBuffer {
    entries: Box<[FilterSpecEntry]>,
    text: Box<[u16]>,
}

impl PackedFilterBuffer {
    /// Number of filters in the table. Never zero.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FilterSpecEntry] {
        &self.entries
    }

    /// The whole string region, terminators included.
    pub fn text(&self) -> &[u16] {
        &self.text
    }

    /// Pointer to the null-terminated string starting at `offset`.
    pub fn ptr_at(&self, offset: usize) -> *const u16 {
        debug_assert!(offset < self.text.len());
        self.text[offset..].as_ptr()
    }

    /// Display name of entry `index`, without its terminator.
    pub fn name_at(&self, index: usize) -> Option<String> {
        self.entries
            .get(index)
            .map(|entry| self.string_at(entry.name_offset))
    }

    /// Spec string of entry `index`, without its terminator.
    pub fn spec_at(&self, index: usize) -> Option<String> {
        self.entries
            .get(index)
            .map(|entry| self.string_at(entry.spec_offset))
    }

    fn string_at(&self, offset: usize) -> String {
        let tail = &self.text[offset..];
        let len = tail.iter().position(|&c| c == NUL).unwrap_or(tail.len());
        String::from_utf16_lossy(&tail[..len])
    }
}

/// `"*.png;*.jpg"` for a filter with extensions `png` and `jpg`.
pub fn to_spec_string(filter: &Filter) -> String {
    let mut spec = String::new();
    for (i, extension) in filter.extensions().iter().enumerate() {
        if i > 0 {
            spec.push(SPEC_SEPARATOR);
        }
        spec.push_str("*.");
        spec.push_str(extension);
    }
    spec
}

/// `"Images (*.png, *.jpg)"`, the form shown in the dialog's type list.
pub fn to_display_string(filter: &Filter) -> String {
    let patterns: Vec<String> = filter
        .extensions()
        .iter()
        .map(|extension| format!("*.{extension}"))
        .collect();
    format!("{} ({})", filter.display_name(), patterns.join(", "))
}

/*
 * Packs `filters` into a single `PackedFilterBuffer`. Returns `None` for an
 * empty list; callers must then skip the native call entirely rather than
 * submit a zero-length table.
 */
pub fn encode(filters: &[Filter]) -> Option<PackedFilterBuffer> {
    if filters.is_empty() {
        return None;
    }

    let specs: Vec<String> = filters.iter().map(to_spec_string).collect();

    // Pass 1: exact size, terminators included.
    let total_len: usize = filters
        .iter()
        .zip(&specs)
        .map(|(filter, spec)| {
            filter.display_name().encode_utf16().count() + 1 + spec.encode_utf16().count() + 1
        })
        .sum();

    // Pass 2: fill. The region is a fixed-size boxed slice from here on.
    let mut text = vec![NUL; total_len].into_boxed_slice();
    let mut entries = Vec::with_capacity(filters.len());
    let mut write_offset = 0;
    for (filter, spec) in filters.iter().zip(&specs) {
        let name_offset = write_offset;
        write_offset = write_terminated(&mut text, write_offset, filter.display_name());
        let spec_offset = write_offset;
        write_offset = write_terminated(&mut text, write_offset, spec);
        entries.push(FilterSpecEntry {
            name_offset,
            spec_offset,
        });
    }
    debug_assert_eq!(write_offset, total_len);

    log::trace!(
        "FilterSpec: Packed {} filters into {} UTF-16 units.",
        entries.len(),
        total_len
    );

    Some(PackedFilterBuffer {
        entries: entries.into_boxed_slice(),
        text,
    })
}

fn write_terminated(text: &mut [u16], mut offset: usize, value: &str) -> usize {
    for unit in value.encode_utf16() {
        text[offset] = unit;
        offset += 1;
    }
    text[offset] = NUL;
    offset + 1
}
