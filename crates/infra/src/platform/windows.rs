//! Win32 foreground window inspection

use vigil_domain::{Result, VigilError};
use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowTextW};

/// Title of the current foreground window.
///
/// Blocking Win32 calls; callers wrap this in `spawn_blocking`.
pub(crate) fn foreground_window_title() -> Result<String> {
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.is_invalid() {
        return Err(VigilError::Platform("no foreground window".into()));
    }

    let mut buffer = [0u16; 512];
    let len = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    if len <= 0 {
        // A window with no title text is still a valid observation
        return Ok(String::new());
    }

    Ok(String::from_utf16_lossy(&buffer[..len as usize]))
}
