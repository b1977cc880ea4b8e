//! C ABI for embedding chatty in non-Rust programs
//!
//! Arguments are checked first; credentials are then resolved from the
//! environment on every call, exactly as [`ClientConfig::from_env`] does.

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult, ErrorKind};
use crate::protocol::{ChatOptions, ChatRequest, Message, Role};
use crate::query::{check_input, check_request, ChatQuery};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

pub const CHATTY_SUCCESS: c_int = 0;
pub const CHATTY_INVALID_INPUT: c_int = 1;
pub const CHATTY_AUTHENTICATION_ERROR: c_int = 2;
pub const CHATTY_TRANSPORT_ERROR: c_int = 3;
pub const CHATTY_PROVIDER_ERROR: c_int = 4;
pub const CHATTY_MALFORMED_RESPONSE: c_int = 5;

pub const CHATTY_ROLE_SYSTEM: c_int = 0;
pub const CHATTY_ROLE_USER: c_int = 1;
pub const CHATTY_ROLE_ASSISTANT: c_int = 2;
pub const CHATTY_ROLE_TOOL: c_int = 3;

/// A role-tagged message. `content` is a NUL-terminated UTF-8 string.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ChattyMessage {
    pub role: c_int,
    pub content: *mut c_char,
}

/// Model and optional sampling values. A zero temperature or top_p is a
/// real value, so each carries its own presence flag.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ChattyOptions {
    pub model: *const c_char,
    pub has_temperature: bool,
    pub temperature: f64,
    pub has_top_p: bool,
    pub top_p: f64,
}

fn status_code(err: &ChatError) -> c_int {
    match err.kind() {
        ErrorKind::InvalidInput => CHATTY_INVALID_INPUT,
        ErrorKind::Authentication => CHATTY_AUTHENTICATION_ERROR,
        ErrorKind::Transport => CHATTY_TRANSPORT_ERROR,
        ErrorKind::Provider => CHATTY_PROVIDER_ERROR,
        ErrorKind::MalformedResponse => CHATTY_MALFORMED_RESPONSE,
    }
}

fn role_from_code(code: c_int) -> Option<Role> {
    match code {
        CHATTY_ROLE_SYSTEM => Some(Role::System),
        CHATTY_ROLE_USER => Some(Role::User),
        CHATTY_ROLE_ASSISTANT => Some(Role::Assistant),
        CHATTY_ROLE_TOOL => Some(Role::Tool),
        _ => None,
    }
}

fn role_code(role: Role) -> c_int {
    match role {
        Role::System => CHATTY_ROLE_SYSTEM,
        Role::User => CHATTY_ROLE_USER,
        Role::Assistant => CHATTY_ROLE_ASSISTANT,
        Role::Tool => CHATTY_ROLE_TOOL,
    }
}

unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn invalid(what: &str) -> ChatError {
    ChatError::InvalidInput(format!("{} is NULL or not valid UTF-8", what))
}

/// Copy a reply across the boundary. A reply with an interior NUL cannot be
/// represented as a C string and counts as malformed.
fn into_c_string(text: String) -> ChatResult<CString> {
    CString::new(text).map_err(|_| {
        ChatError::MalformedResponse("reply contains an interior NUL byte".to_string())
    })
}

/// Ask `model` a single question.
///
/// On success writes a newly allocated string to `*out` and returns
/// `CHATTY_SUCCESS`; the caller frees it with `chatty_free_string`. On
/// failure `*out` is set to NULL and a non-zero status is returned.
///
/// # Safety
///
/// `model` and `prompt` must be NULL or valid NUL-terminated strings, and
/// `out` must be NULL or point to writable storage for one pointer.
#[no_mangle]
pub unsafe extern "C" fn chatty_ask(
    model: *const c_char,
    prompt: *const c_char,
    out: *mut *mut c_char,
) -> c_int {
    if out.is_null() {
        return CHATTY_INVALID_INPUT;
    }
    *out = std::ptr::null_mut();

    let (model, prompt) = match (borrow_str(model), borrow_str(prompt)) {
        (Some(m), Some(p)) => (m, p),
        _ => return CHATTY_INVALID_INPUT,
    };

    let answer = check_input(model, prompt)
        .and_then(|_| ClientConfig::from_env())
        .and_then(|config| crate::ask(&config, model, prompt))
        .and_then(into_c_string);

    match answer {
        Ok(c_str) => {
            *out = c_str.into_raw();
            CHATTY_SUCCESS
        }
        Err(err) => status_code(&err),
    }
}

unsafe fn build_request(
    msgc: c_int,
    msgv: *const ChattyMessage,
    options: &ChattyOptions,
) -> ChatResult<ChatRequest> {
    if msgv.is_null() || msgc <= 0 {
        return Err(ChatError::InvalidInput(
            "at least one message is required".to_string(),
        ));
    }

    let model = borrow_str(options.model).ok_or_else(|| invalid("model"))?;
    let messages = std::slice::from_raw_parts(msgv, msgc as usize)
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let role = role_from_code(m.role).ok_or_else(|| {
                ChatError::InvalidInput(format!("message {} has unknown role {}", i, m.role))
            })?;
            let content =
                borrow_str(m.content).ok_or_else(|| invalid(&format!("message {} content", i)))?;
            Ok(Message::new(role, content))
        })
        .collect::<ChatResult<Vec<_>>>()?;

    let sampling = ChatOptions {
        temperature: options.has_temperature.then_some(options.temperature),
        top_p: options.has_top_p.then_some(options.top_p),
    };
    let request = ChatRequest::new(model, messages).with_options(sampling);
    check_request(&request)?;
    Ok(request)
}

/// Send a whole conversation and receive the model's reply.
///
/// On success `*response` holds the reply's role and a newly allocated
/// content string, freed with `chatty_free_string`. On failure
/// `response->content` is NULL.
///
/// # Safety
///
/// `msgv` must be NULL or point to `msgc` initialized messages whose
/// `content` fields are NULL or valid NUL-terminated strings.
/// `options.model` must be NULL or a valid NUL-terminated string, and
/// `response` must be NULL or point to writable storage for one message.
#[no_mangle]
pub unsafe extern "C" fn chatty_chat(
    msgc: c_int,
    msgv: *const ChattyMessage,
    options: ChattyOptions,
    response: *mut ChattyMessage,
) -> c_int {
    if response.is_null() {
        return CHATTY_INVALID_INPUT;
    }
    *response = ChattyMessage {
        role: CHATTY_ROLE_ASSISTANT,
        content: std::ptr::null_mut(),
    };

    let reply = build_request(msgc, msgv, &options).and_then(|request| {
        let config = ClientConfig::from_env()?;
        let reply = ChatQuery::new(config)?.chat_blocking(request)?;
        Ok((reply.role, into_c_string(reply.content)?))
    });

    match reply {
        Ok((role, content)) => {
            *response = ChattyMessage {
                role: role_code(role),
                content: content.into_raw(),
            };
            CHATTY_SUCCESS
        }
        Err(err) => status_code(&err),
    }
}

/// Frees a string returned by `chatty_ask` or `chatty_chat`.
///
/// # Safety
///
/// `s` must be NULL or a pointer obtained from this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn chatty_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    let _ = CString::from_raw(s);
}

/// Static description of a status code. Never NULL; never freed.
#[no_mangle]
pub extern "C" fn chatty_error_string(code: c_int) -> *const c_char {
    let message: &'static CStr = match code {
        CHATTY_SUCCESS => c"Success",
        CHATTY_INVALID_INPUT => c"Invalid input",
        CHATTY_AUTHENTICATION_ERROR => c"Invalid or missing API key",
        CHATTY_TRANSPORT_ERROR => c"Network error",
        CHATTY_PROVIDER_ERROR => c"Provider returned an error status",
        CHATTY_MALFORMED_RESPONSE => c"Failed to parse provider response",
        _ => c"Unknown error",
    };
    message.as_ptr()
}

/// Library version as a static NUL-terminated string.
#[no_mangle]
pub extern "C" fn chatty_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
