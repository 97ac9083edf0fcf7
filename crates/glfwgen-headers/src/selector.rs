//! Platform selector
//!
//! Registers the macro definitions and synthetic header fragments for a
//! (window platform, context platform) pair before preprocessing. The
//! fragments are minimal typedef stubs standing in for the system headers
//! `glfw3native.h` includes; the `GLFW_EXPOSE_NATIVE_*` macros switch the
//! matching declaration sections on.
//!
//! Some stubs are registered on both axes (Xlib for X11 and for GLX,
//! `windows.h` for Win32 and for WGL). The repetition keeps the two axes
//! independent; last-write-wins registration makes it harmless.

use glfwgen_core::{ContextPlatform, Result, WindowPlatform};
use glfwgen_preprocessor::{FragmentTable, MacroTable};
use tracing::debug;

const WINDOWS_H: &str = "\
typedef void* HWND;
typedef void* HGLRC;
";

const APPLICATION_SERVICES_H: &str = "\
typedef uint32_t CGDirectDisplayID;
";

const XLIB_H: &str = "\
typedef unsigned long XID;
typedef XID Window;
typedef unsigned long VisualID;
typedef struct _XDisplay Display;
";

const XRANDR_H: &str = "\
typedef XID RROutput;
typedef XID RRCrtc;
";

const GLX_H: &str = "\
#ifndef GLFW_EXPOSE_NATIVE_X11
typedef unsigned long XID;
#endif
typedef void* GLXContext;
typedef XID GLXWindow;
";

const EGL_H: &str = "\
typedef void* EGLDisplay;
typedef void* EGLContext;
typedef void* EGLSurface;
";

const OSMESA_H: &str = "\
typedef struct osmesa_context* OSMesaContext;
";

/// Register the macros and fragments for one composition
///
/// Baseline entries (`GLFWAPI`, empty stdlib stubs) are registered
/// unconditionally; at most one window expose macro and at most one
/// context expose macro are ever defined. Passing `None` on an axis
/// leaves that axis without any native surface.
pub fn apply(
    macros: &mut MacroTable,
    fragments: &mut FragmentTable,
    window: Option<WindowPlatform>,
    context: Option<ContextPlatform>,
) -> Result<()> {
    debug!(?window, ?context, "registering platform macros and fragments");

    macros.define("GLFWAPI", None)?;
    fragments.add("stdint.h", "");
    fragments.add("stddef.h", "");
    fragments.add("GL/gl.h", "");

    if let Some(window) = window {
        macros.define(window.expose_macro(), Some("1"))?;
        match window {
            WindowPlatform::Win32 => {
                macros.define("_WIN32", Some("1"))?;
                macros.define("WINGDIAPI", None)?;
                macros.define("CALLBACK", None)?;
                fragments.add("windows.h", WINDOWS_H);
            }
            WindowPlatform::Cocoa => {
                fragments.add(
                    "ApplicationServices/ApplicationServices.h",
                    APPLICATION_SERVICES_H,
                );
            }
            WindowPlatform::X11 => {
                fragments.add("X11/Xlib.h", XLIB_H);
                fragments.add("X11/extensions/Xrandr.h", XRANDR_H);
            }
            WindowPlatform::Wayland => {
                fragments.add("wayland-client.h", "");
            }
        }
    }

    if let Some(context) = context {
        macros.define(context.expose_macro(), Some("1"))?;
        match context {
            ContextPlatform::Wgl => {
                fragments.add("windows.h", WINDOWS_H);
            }
            ContextPlatform::Nsgl => {
                fragments.add(
                    "ApplicationServices/ApplicationServices.h",
                    APPLICATION_SERVICES_H,
                );
            }
            ContextPlatform::Glx => {
                fragments.add("GL/glx.h", GLX_H);
                fragments.add("X11/Xlib.h", XLIB_H);
                fragments.add("X11/extensions/Xrandr.h", XRANDR_H);
            }
            ContextPlatform::Egl => {
                fragments.add("EGL/egl.h", EGL_H);
            }
            ContextPlatform::Osmesa => {
                fragments.add("GL/osmesa.h", OSMESA_H);
            }
        }
    }

    Ok(())
}
