//! Python bindings for chatty
//!
//! ```python
//! import chatty
//! print(chatty.ask("gpt-4o", "What is the C++ FQA?"))
//! ```

use chatty_core::{check_input, ChatError, ChatQuery, ChattyConfig, SecretString};
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyValueError};
use pyo3::prelude::*;

create_exception!(chatty, ChattyError, PyException, "Base class for chatty failures.");
create_exception!(chatty, TransportError, ChattyError, "The provider could not be reached.");
create_exception!(chatty, AuthenticationError, ChattyError, "API key missing or rejected.");
create_exception!(chatty, ProviderError, ChattyError, "The provider answered with an error status.");
create_exception!(chatty, MalformedResponseError, ChattyError, "The reply had an unexpected shape.");

fn to_py_err(err: ChatError) -> PyErr {
    let message = err.to_string();
    match err {
        ChatError::InvalidInput(_) => PyValueError::new_err(message),
        ChatError::Transport { .. } => TransportError::new_err(message),
        ChatError::Authentication(_) => AuthenticationError::new_err(message),
        ChatError::Provider { .. } => ProviderError::new_err(message),
        ChatError::MalformedResponse(_) => MalformedResponseError::new_err(message),
    }
}

/// Ask `model` a single question and return the answer text.
///
/// The base URL and key default to the same environment variables the CLI
/// reads. The GIL is released while waiting for the provider.
#[pyfunction]
#[pyo3(signature = (model, prompt, *, base_url=None, api_key=None, temperature=None, top_p=None))]
fn ask(
    py: Python<'_>,
    model: String,
    prompt: String,
    base_url: Option<String>,
    api_key: Option<String>,
    temperature: Option<f64>,
    top_p: Option<f64>,
) -> PyResult<String> {
    check_input(&model, &prompt).map_err(to_py_err)?;

    let overrides = ChattyConfig {
        base_url,
        api_key: api_key.map(SecretString::new),
        model: None,
        temperature,
        top_p,
    };
    let config = overrides.resolve().map_err(to_py_err)?;
    let query = ChatQuery::new(config)
        .map_err(to_py_err)?
        .with_options(overrides.options());

    py.allow_threads(move || query.ask_blocking(&model, &prompt))
        .map_err(to_py_err)
}

/// Returns the version of the chatty library.
#[pyfunction]
fn version() -> &'static str {
    chatty_core::version()
}

#[pymodule]
fn chatty(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("__version__", chatty_core::version())?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(ask, m)?)?;

    m.add("ChattyError", py.get_type::<ChattyError>())?;
    m.add("TransportError", py.get_type::<TransportError>())?;
    m.add("AuthenticationError", py.get_type::<AuthenticationError>())?;
    m.add("ProviderError", py.get_type::<ProviderError>())?;
    m.add("MalformedResponseError", py.get_type::<MalformedResponseError>())?;

    Ok(())
}
