use crate::error::Error;

use super::options::ListOptions;

/// Fetches pages until the server returns an empty cursor and concatenates
/// the items in server order. The cursor is relayed exactly as received. Any
/// page failure discards what was collected so far.
pub(crate) fn collect_pages<T, F>(page_size: u32, mut fetch: F) -> Result<Vec<T>, Error>
where
    F: FnMut(&ListOptions) -> Result<(Vec<T>, String), Error>,
{
    let mut items = Vec::new();
    let mut options = ListOptions::new().with_limit(page_size);
    loop {
        let (page, next_cursor) = fetch(&options)?;
        items.extend(page);
        if next_cursor.is_empty() {
            return Ok(items);
        }
        log::debug!("following page cursor {next_cursor:?}");
        options.cursor = Some(next_cursor);
    }
}
