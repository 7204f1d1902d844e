// SPDX-License-Identifier: MIT OR Apache-2.0

//! Readable call stacks for diagnostic messages.
//!
//! [`capture_trace`] walks the current stack (at most 64 frames), describes
//! each frame as `module(mangled+0xoff) [0xaddr]` and renders those lines:
//!
//! ```text
//! Stack Trace from BatteryChecker:
//! 1:  sensors::battery::read_capacity::h5b4e2d0a9c8f7e61+0x4c
//!     addr2line 0x6130c -e sensors
//! ```
//!
//! The second line of each frame can be pasted into a shell next to the
//! matching binary to get a source line. Each frame is labelled with the
//! object it was loaded from (the executable or a shared library), and the
//! bracketed address is relative to that object, which is what `addr2line`
//! wants for position-independent code.
//!
//! Rendering never fails. A name that does not demangle is shown as is, and a
//! line that does not have the `(name+offset)` shape is shown whole.

use std::fmt::Write;

/// Frames captured per trace.
pub const MAX_FRAMES: usize = 64;

/// Tool named in the per-frame resolution hint.
pub const ADDR2LINE: &str = "addr2line";

/**
Captures the caller's stack and renders it under a `Stack Trace from <label>:`
heading.
*/
#[inline(never)]
pub fn capture_trace(label: &str) -> String {
    trace_of_caller(label)
}

/**
Renders the stack of whoever called the entry point that called this.

Every public way into the tracer calls this directly, so the first frame
after it is the entry point, which [`render_trace`] skips.
*/
#[inline(never)]
pub(crate) fn trace_of_caller(label: &str) -> String {
    render_trace(label, &capture_raw_frames())
}

/// Raw lines starting with the tracer's entry frame.
#[inline(never)]
fn capture_raw_frames() -> Vec<String> {
    let mut frames = Vec::with_capacity(MAX_FRAMES);
    backtrace::trace(|frame| {
        frames.push(frame.clone());
        frames.len() < MAX_FRAMES
    });
    // drop the unwinder's frames and the tracer's own
    let internal = trace_of_caller as fn(&str) -> String as usize;
    if let Some(pos) = frames
        .iter()
        .position(|f| f.symbol_address() as usize == internal)
    {
        frames.drain(..=pos);
    }
    let exe = exe_name();
    frames.iter().map(|f| describe_frame(f, &exe)).collect()
}

fn exe_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn describe_frame(frame: &backtrace::Frame, exe: &str) -> String {
    let ip = frame.ip() as usize;
    let object = LoadedObject::containing(ip);
    let module = object.as_ref().map_or(exe, |o| o.name.as_str());

    let mut name = None;
    let mut relative = None;
    backtrace::resolve_frame(frame, |symbol| {
        // the symbolizer reports the object-relative lookup address
        relative = relative.or(symbol.addr().map(|a| a as usize));
        // inlined frames resolve to several symbols; the first is innermost
        if name.is_none() {
            name = symbol
                .name()
                .map(|n| String::from_utf8_lossy(n.as_bytes()).into_owned());
        }
    });
    let name = name.or_else(|| object.as_ref().and_then(|o| o.symbol.clone()));
    let address = relative
        .or_else(|| object.as_ref().map(|o| ip.wrapping_sub(o.base)))
        .unwrap_or(ip);

    let start = match frame.symbol_address() as usize {
        0 => object.as_ref().map_or(0, |o| o.symbol_start),
        start => start,
    };
    match name {
        Some(name) if start != 0 => format!(
            "{module}({name}+{:#x}) [{address:#x}]",
            ip.wrapping_sub(start)
        ),
        Some(name) => format!("{module}({name}) [{address:#x}]"),
        None => format!("{module}() [{address:#x}]"),
    }
}

/// The executable or shared library an address was loaded from.
#[cfg_attr(not(unix), allow(dead_code))]
struct LoadedObject {
    name: String,
    base: usize,
    symbol: Option<String>,
    symbol_start: usize,
}

impl LoadedObject {
    #[cfg(unix)]
    fn containing(ip: usize) -> Option<Self> {
        use std::ffi::CStr;
        use std::path::Path;

        let mut info = std::mem::MaybeUninit::<libc::Dl_info>::zeroed();
        // SAFETY: dladdr only reads the loader's tables and fills `info`.
        let found = unsafe { libc::dladdr(ip as *const libc::c_void, info.as_mut_ptr()) };
        if found == 0 {
            return None;
        }
        // SAFETY: a nonzero return means `info` was filled in.
        let info = unsafe { info.assume_init() };
        let c_string = |ptr: *const libc::c_char| {
            // SAFETY: dladdr hands back null or NUL-terminated strings owned by the loader.
            (!ptr.is_null()).then(|| unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
        };
        let name = c_string(info.dli_fname)
            .and_then(|path| {
                Path::new(&path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(exe_name);
        Some(Self {
            name,
            base: info.dli_fbase as usize,
            symbol: c_string(info.dli_sname),
            symbol_start: info.dli_saddr as usize,
        })
    }

    #[cfg(not(unix))]
    fn containing(_ip: usize) -> Option<Self> {
        None
    }
}

/// The `(name+offset)` part of a raw frame line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSymbol<'a> {
    pub name: &'a str,
    pub offset: &'a str,
}

/**
Finds `name` and `offset` in `module(name+offset) [address]`.

The name runs from the last `(` before the offset's `+`; the offset ends at
the first `)` after that `+`.
*/
pub fn parse_frame_line(line: &str) -> Option<FrameSymbol<'_>> {
    let mut begin_name = None;
    let mut begin_offset = None;
    for (i, c) in line.char_indices() {
        match c {
            '(' => begin_name = Some(i),
            '+' => begin_offset = Some(i),
            ')' if begin_offset.is_some() => {
                return match (begin_name, begin_offset) {
                    (Some(name), Some(offset)) if name < offset => Some(FrameSymbol {
                        name: &line[name + 1..offset],
                        offset: &line[offset + 1..i],
                    }),
                    _ => None,
                };
            }
            _ => {}
        }
    }
    None
}

/// The object name in front of the `(` or ` [`, if present.
pub fn frame_module(line: &str) -> Option<&str> {
    let end = line.find(['(', '['])?;
    let module = line[..end].trim_end();
    (!module.is_empty()).then_some(module)
}

/// The address between the last `[` and `]`, if present.
pub fn frame_address(line: &str) -> Option<&str> {
    let start = line.rfind('[')? + 1;
    let rest = &line[start..];
    let address = rest.strip_suffix(']').unwrap_or(rest);
    (!address.is_empty()).then_some(address)
}

/**
Renders raw frame lines as a trace.

`raw[0]` is the tracer's own frame and is skipped, as is the last frame (the
runtime's entry trampoline). Some unwinders repeat the final frame until the
buffer is full; the list is cut at the first repeat. The hint under a frame
names the object from the front of its line and is left out when the line
has no object or no address.
*/
pub fn render_trace(label: &str, raw: &[String]) -> String {
    let mut out = format!("Stack Trace from {label}:\r\n");
    if raw.is_empty() {
        out.push_str("  <empty, possibly corrupt>\r\n");
        return out;
    }

    let mut len = raw.len();
    for i in 1..len.saturating_sub(1) {
        if raw[i] == raw[i + 1] {
            len = i + 2;
            break;
        }
    }

    for (i, line) in raw.iter().enumerate().take(len - 1).skip(1) {
        let _ = write!(out, "{i}:  ");
        match parse_frame_line(line) {
            Some(frame) => match rustc_demangle::try_demangle(frame.name) {
                Ok(demangled) => {
                    let _ = write!(out, "{demangled}+{}", frame.offset);
                }
                Err(_) => {
                    let _ = write!(out, "{}+{}", frame.name, frame.offset);
                }
            },
            None => out.push_str(line),
        }
        out.push_str("\r\n");
        if let (Some(address), Some(module)) = (frame_address(line), frame_module(line)) {
            let _ = write!(out, "    {ADDR2LINE} {address} -e {module}\r\n");
        }
    }
    out
}
