// Scripted generation backends and a one-shot HTTP responder.

use crate::error::GenerationError;
use crate::generation::{ChatCompletionRequest, ChatCompletionResponse, GenerationBackend};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Clone)]
pub enum Reply {
    Text(String),
    NoChoices,
    Status(u16),
}

/// Backend that answers every request with the same reply and records requests
pub struct ScriptedBackend {
    reply: Reply,
    requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl ScriptedBackend {
    /// Returns the backend plus a handle to the requests it will receive
    pub fn new(reply: Reply) -> (Self, Arc<Mutex<Vec<ChatCompletionRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                reply,
                requests: Arc::clone(&requests),
            },
            requests,
        )
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string())).0
    }
}

impl GenerationBackend for ScriptedBackend {
    fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.reply {
            Reply::Text(text) => Ok(ChatCompletionResponse::from_text(text.clone())),
            Reply::NoChoices => Ok(ChatCompletionResponse::default()),
            Reply::Status(status) => Err(GenerationError::Backend {
                status: *status,
                body: "scripted failure".to_string(),
            }),
        }
    }
}

/// Serve exactly one HTTP request on localhost with a canned response
///
/// Returns the base URL and a handle yielding the raw request that was received.
pub fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&raw);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (format!("http://{}/v1/chat/completions", addr), handle)
}
