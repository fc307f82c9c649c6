/// Moving groups of tabs into fresh windows
use crate::error::HostError;
use crate::host::{APPEND_INDEX, BrowserHost, CreateWindow};
use crate::snapshot::{TabId, WindowId};

/// Page a blank new window opens on
pub const NEW_TAB_URL: &str = "chrome://newtab/";

/// Open a focused window around the first tab and append the rest in order.
/// Returns `None` when there is nothing to move.
pub async fn move_tabs_to_new_window<H: BrowserHost>(
    host: &H,
    tab_ids: &[TabId],
) -> Result<Option<WindowId>, HostError> {
    let Some((first, rest)) = tab_ids.split_first() else {
        return Ok(None);
    };

    let window = host.create_window(CreateWindow::around_tab(*first)).await?;
    for tab_id in rest {
        host.move_tab(*tab_id, window.id, APPEND_INDEX).await?;
    }
    Ok(Some(window.id))
}

pub async fn open_blank_window<H: BrowserHost>(host: &H) -> Result<WindowId, HostError> {
    let window = host.create_window(CreateWindow::with_url(NEW_TAB_URL)).await?;
    Ok(window.id)
}
