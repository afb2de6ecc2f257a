//! HTML extraction for the endpoints without a JSON representation
//!
//! PatentSafe renders document text and the in-tray listings as HTML
//! pages. These are pure functions over the page source so they can be
//! tested against fixtures without a live instance.

use scraper::{ElementRef, Html, Selector};

use crate::types::{IntrayEntry, PsError, UserIntrays};

fn selector(css: &str) -> Result<Selector, PsError> {
    Selector::parse(css).map_err(|e| PsError::Scrape(format!("invalid selector '{}': {}", css, e)))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the rendered document text from `documents/text.html`.
///
/// The text lives in a `div.ps-document-text`; a page without one means
/// the document was inaccessible.
pub fn document_text(html: &str) -> Result<String, PsError> {
    let page = Html::parse_document(html);
    let text_div = selector("div.ps-document-text")?;

    let node = page
        .select(&text_div)
        .next()
        .ok_or_else(|| PsError::Scrape("could not find document text content in the response".to_string()))?;

    Ok(cell_text(node))
}

fn entry_from_row(row: ElementRef, cells: &Selector) -> Option<IntrayEntry> {
    let mut cols = row.select(cells);
    let id = cell_text(cols.next()?);
    if id.is_empty() {
        return None;
    }
    let title = cols.next().map(cell_text).filter(|s| !s.is_empty());
    let date = cols.next().map(cell_text).filter(|s| !s.is_empty());
    Some(IntrayEntry { id, title, date })
}

/// Parse an in-tray table (`table#<table_id>`) into entries.
///
/// The first row is the header. A missing table means an empty tray, not
/// an error; that matches how the pages render for users with nothing
/// pending.
pub fn intray_rows(html: &str, table_id: &str) -> Result<Vec<IntrayEntry>, PsError> {
    let page = Html::parse_document(html);
    let rows = selector(&format!("table#{} tr", table_id))?;
    let cells = selector("td")?;

    Ok(page
        .select(&rows)
        .skip(1)
        .filter_map(|row| entry_from_row(row, &cells))
        .collect())
}

/// Parse the admin overview (`table#users-overview`) into per-user trays.
///
/// Each outer row names a user and nests a `table.user-documents` with
/// that user's pending documents. The table is only rendered for admin
/// accounts, so its absence is an access error.
pub fn all_intrays(html: &str) -> Result<UserIntrays, PsError> {
    let page = Html::parse_document(html);
    // Direct-child chain keeps the nested per-user tables out of the
    // outer row iteration
    let user_rows = selector("table#users-overview > tbody > tr")?;
    let cells = selector("td")?;
    let doc_rows = selector("table.user-documents tr")?;

    if page.select(&selector("table#users-overview")?).next().is_none() {
        return Err(PsError::Scrape(
            "could not find users overview table - you may not have admin access".to_string(),
        ));
    }

    let mut trays = UserIntrays::new();
    for row in page.select(&user_rows).skip(1) {
        let Some(username_cell) = row.select(&cells).next() else {
            continue;
        };
        let username = cell_text(username_cell);
        if username.is_empty() {
            continue;
        }

        let documents = row
            .select(&doc_rows)
            .skip(1)
            .filter_map(|doc_row| entry_from_row(doc_row, &cells))
            .collect();

        trays.insert(username, documents);
    }

    Ok(trays)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT_PAGE: &str = r#"
        <html><body>
          <div class="ps-header">PatentSafe</div>
          <div class="ps-document-text">
            <p>Mixed 5g of pigment  </p>
            <p>with 100ml of solvent.</p>
          </div>
        </body></html>"#;

    const GLOBAL_INTRAY: &str = r#"
        <html><body>
          <table id="documents">
            <tr><th>ID</th><th>Title</th><th>Date</th></tr>
            <tr><td>AMPH3100012802</td><td>Cabbage pigments</td><td>2023-04-01</td></tr>
            <tr><td>AMPH3100012803</td><td></td><td>2023-04-02</td></tr>
          </table>
        </body></html>"#;

    const OVERVIEW_ADMIN: &str = r#"
        <html><body>
          <table id="bits">
            <tr><th>ID</th><th>Title</th></tr>
            <tr><td>BIT001</td><td>My draft</td></tr>
          </table>
          <table id="users-overview">
            <tr><th>User</th><th>Documents</th></tr>
            <tr>
              <td>alice</td>
              <td>
                <table class="user-documents">
                  <tr><th>ID</th><th>Title</th><th>Date</th></tr>
                  <tr><td>DOC-A1</td><td>Alpha</td><td>2023-05-01</td></tr>
                  <tr><td>DOC-A2</td><td>Beta</td><td>2023-05-02</td></tr>
                </table>
              </td>
            </tr>
            <tr>
              <td>bob</td>
              <td><table class="user-documents"><tr><th>ID</th></tr></table></td>
            </tr>
          </table>
        </body></html>"#;

    #[test]
    fn document_text_is_extracted_and_trimmed() {
        let text = document_text(TEXT_PAGE).unwrap();
        assert_eq!(text, "Mixed 5g of pigment with 100ml of solvent.");
    }

    #[test]
    fn document_text_missing_div_is_an_error() {
        let err = document_text("<html><body><p>login required</p></body></html>").unwrap_err();
        assert!(matches!(err, PsError::Scrape(_)));
    }

    #[test]
    fn intray_rows_skip_header_and_capture_cells() {
        let rows = intray_rows(GLOBAL_INTRAY, "documents").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            IntrayEntry {
                id: "AMPH3100012802".to_string(),
                title: Some("Cabbage pigments".to_string()),
                date: Some("2023-04-01".to_string()),
            }
        );
        // Empty title cell becomes None
        assert_eq!(rows[1].title, None);
        assert_eq!(rows[1].date, Some("2023-04-02".to_string()));
    }

    #[test]
    fn missing_intray_table_means_empty_tray() {
        let rows = intray_rows("<html><body></body></html>", "documents").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn personal_tray_reads_the_bits_table() {
        let rows = intray_rows(OVERVIEW_ADMIN, "bits").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "BIT001");
    }

    #[test]
    fn all_intrays_group_documents_by_user() {
        let trays = all_intrays(OVERVIEW_ADMIN).unwrap();
        assert_eq!(trays.len(), 2);
        assert_eq!(trays["alice"].len(), 2);
        assert_eq!(trays["alice"][0].id, "DOC-A1");
        assert_eq!(trays["alice"][1].title, Some("Beta".to_string()));
        assert!(trays["bob"].is_empty());
    }

    #[test]
    fn all_intrays_without_overview_table_is_an_access_error() {
        let err = all_intrays("<html><body><table id='bits'></table></body></html>").unwrap_err();
        match err {
            PsError::Scrape(msg) => assert!(msg.contains("admin access")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
