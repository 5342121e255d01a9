use bevy::log::info;
use thiserror::Error;

/// A single calendar entry, written out as an iCalendar document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Local start time, `YYYYMMDDTHHMMSS`
    pub start: &'static str,
    /// Local end time, `YYYYMMDDTHHMMSS`
    pub end: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub location: &'static str,
}

impl Default for CalendarEvent {
    fn default() -> Self {
        Self {
            start: "20260215T140000",
            end: "20260215T160000",
            summary: "Valentine's Day at Nobu Toronto",
            description: "Valentine's Day celebration dinner",
            location: "Nobu Toronto, 80 Yorkville Ave, Toronto, ON",
        }
    }
}

impl CalendarEvent {
    pub fn to_ics(&self) -> String {
        [
            "BEGIN:VCALENDAR".to_owned(),
            "VERSION:2.0".to_owned(),
            "BEGIN:VEVENT".to_owned(),
            format!("DTSTART:{}", self.start),
            format!("DTEND:{}", self.end),
            format!("SUMMARY:{}", self.summary),
            format!("DESCRIPTION:{}", self.description),
            format!("LOCATION:{}", self.location),
            "STATUS:CONFIRMED".to_owned(),
            "END:VEVENT".to_owned(),
            "END:VCALENDAR".to_owned(),
        ]
        .join("\n")
    }
}

#[derive(Error, Debug)]
pub enum CalendarExportError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser refused the download: {0}")]
    Browser(String),
}

/// Writes the event next to the executable's working directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn export(event: &CalendarEvent, file_name: &str) -> Result<(), CalendarExportError> {
    std::fs::write(file_name, event.to_ics()).map_err(|source| CalendarExportError::Write {
        path: file_name.to_owned(),
        source,
    })?;
    info!("Calendar event written to {file_name}");
    Ok(())
}

/// Hands the event to the browser as a `text/calendar` download.
#[cfg(target_arch = "wasm32")]
pub fn export(event: &CalendarEvent, file_name: &str) -> Result<(), CalendarExportError> {
    use wasm_bindgen::JsCast;

    fn browser_error(err: wasm_bindgen::JsValue) -> CalendarExportError {
        CalendarExportError::Browser(format!("{err:?}"))
    }

    let window = web_sys::window()
        .ok_or_else(|| CalendarExportError::Browser("no global `window` exists".to_owned()))?;
    let document = window
        .document()
        .ok_or_else(|| CalendarExportError::Browser("window has no document".to_owned()))?;
    let body = document
        .body()
        .ok_or_else(|| CalendarExportError::Browser("document has no body".to_owned()))?;

    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(&event.to_ics()));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/calendar;charset=utf-8");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(browser_error)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(browser_error)?;

    let link = document
        .create_element("a")
        .map_err(browser_error)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|element| browser_error(element.into()))?;
    link.set_href(&url);
    link.set_download(file_name);
    body.append_child(&link).map_err(browser_error)?;
    link.click();
    body.remove_child(&link).map_err(browser_error)?;
    web_sys::Url::revoke_object_url(&url).map_err(browser_error)?;

    info!("Calendar event offered as {file_name}");
    Ok(())
}
