use tty2rpi_bridge::SourceError;

/// A visible top-level window and the executable that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: isize,
    pub title: String,
    /// Lower-case file name of the owning executable, empty when unknown.
    pub process_name: String,
}

impl WindowInfo {
    pub fn new(handle: isize, title: impl Into<String>, process_name: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
            process_name: process_name.into().to_ascii_lowercase(),
        }
    }
}

/// Lists the visible, titled top-level windows.
pub trait WindowEnumerator: Send {
    fn visible_windows(&mut self) -> Result<Vec<WindowInfo>, SourceError>;

    /// Whether `handle` still names a window, listed or not. A window that
    /// is only hidden or momentarily untitled is still there.
    fn is_window(&self, _handle: isize) -> bool {
        false
    }
}

/// The desktop of the current session.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopWindows;

#[cfg(windows)]
impl WindowEnumerator for DesktopWindows {
    fn visible_windows(&mut self) -> Result<Vec<WindowInfo>, SourceError> {
        win32::visible_windows()
    }

    fn is_window(&self, handle: isize) -> bool {
        win32::is_window(handle)
    }
}

#[cfg(not(windows))]
impl WindowEnumerator for DesktopWindows {
    fn visible_windows(&mut self) -> Result<Vec<WindowInfo>, SourceError> {
        Err(SourceError::Unavailable(
            "window enumeration needs Windows".to_string(),
        ))
    }
}

#[cfg(windows)]
mod win32 {
    use std::path::Path;

    use tracing::debug;
    use tty2rpi_bridge::SourceError;
    use windows::core::PWSTR;
    use windows::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, TRUE};
    use windows::Win32::System::Threading::{
        OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
        PROCESS_QUERY_LIMITED_INFORMATION,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
        IsWindow, IsWindowVisible,
    };

    use super::WindowInfo;

    pub(super) fn visible_windows() -> Result<Vec<WindowInfo>, SourceError> {
        let mut found: Vec<WindowInfo> = Vec::new();
        unsafe {
            EnumWindows(
                Some(collect_window),
                LPARAM(&mut found as *mut Vec<WindowInfo> as isize),
            )
        }
        .map_err(|err| SourceError::Unavailable(format!("EnumWindows failed: {err}")))?;
        Ok(found)
    }

    pub(super) fn is_window(handle: isize) -> bool {
        unsafe { IsWindow(HWND(handle as *mut std::ffi::c_void)) }.as_bool()
    }

    unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let found = &mut *(lparam.0 as *mut Vec<WindowInfo>);
        if !IsWindowVisible(hwnd).as_bool() {
            return TRUE;
        }
        let title = window_title(hwnd);
        if title.is_empty() {
            return TRUE;
        }
        let process_name = process_name(hwnd).unwrap_or_default();
        found.push(WindowInfo::new(hwnd.0 as isize, title, process_name));
        TRUE
    }

    unsafe fn window_title(hwnd: HWND) -> String {
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u16; len as usize + 1];
        let copied = GetWindowTextW(hwnd, &mut buf);
        String::from_utf16_lossy(&buf[..copied.max(0) as usize])
    }

    unsafe fn process_name(hwnd: HWND) -> Option<String> {
        let mut pid = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut pid as *mut u32));
        if pid == 0 {
            return None;
        }
        let process = match OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) {
            Ok(process) => process,
            Err(err) => {
                debug!(pid, error = %err, "cannot open window owner");
                return None;
            }
        };
        let mut buf = [0u16; 1024];
        let mut size = buf.len() as u32;
        let queried = QueryFullProcessImageNameW(
            process,
            PROCESS_NAME_WIN32,
            PWSTR(buf.as_mut_ptr()),
            &mut size,
        );
        let _ = CloseHandle(process);
        queried.ok()?;
        let path = String::from_utf16_lossy(&buf[..size as usize]);
        Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
    }
}
