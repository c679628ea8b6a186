//! Common test utilities for the site_assets integration tests
//!
//! Image fixtures are generated on the fly into temporary directories.

#![allow(dead_code)]

/// Synthetic images written to disk
pub mod fixtures {
    use image::{Rgb, RgbImage};
    use std::path::{Path, PathBuf};

    /// Size of the real Android screenshots the crop table was measured on
    pub const SCREENSHOT_W: u32 = 1080;
    pub const SCREENSHOT_H: u32 = 2376;

    /// Vertical gradient so scaled output is not a flat colour
    pub fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 128])
        })
    }

    pub fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(rgb))
    }

    /// Save `img` as `dir/name`; the format follows the extension
    pub fn write(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
        let path = dir.join(name);
        img.save(&path).expect("write fixture image");
        path
    }
}

/// Classifier doubles
pub mod mock_classifier {
    use site_assets::error::{AssetError, Result};
    use site_assets::labels::{Classifier, Label};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    /// Returns canned labels per file name and records every call
    #[derive(Default)]
    pub struct MockClassifier {
        labels: HashMap<String, Vec<Label>>,
        failing: Vec<String>,
        calls: RefCell<Vec<String>>,
    }

    impl MockClassifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_labels(mut self, file: &str, labels: &[(&str, f32)]) -> Self {
            self.labels.insert(
                file.to_string(),
                labels.iter().map(|(l, c)| Label::new(*l, *c)).collect(),
            );
            self
        }

        pub fn failing_on(mut self, file: &str) -> Self {
            self.failing.push(file.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Classifier for MockClassifier {
        fn name(&self) -> &str {
            "mock"
        }

        fn classify(&self, path: &Path) -> Result<Vec<Label>> {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.calls.borrow_mut().push(name.clone());
            if self.failing.contains(&name) {
                return Err(AssetError::timeout("classify", 30_000));
            }
            Ok(self.labels.get(&name).cloned().unwrap_or_default())
        }
    }
}

/// Minimal HTTP/1.1 server standing in for an OpenAI-compatible model API
pub mod stub_server {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Response for one request
    pub struct Reply {
        pub status: u16,
        pub body: String,
        /// Held before anything is written back
        pub delay: Duration,
    }

    impl Reply {
        pub fn json(status: u16, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                delay: Duration::ZERO,
            }
        }

        pub fn stalled(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::json(200, "{}")
            }
        }
    }

    /// Chat completion body whose first message carries `content`
    pub fn chat_reply(content: &str) -> String {
        serde_json::json!({ "choices": [{ "message": { "content": content } }] }).to_string()
    }

    type Handler = Arc<dyn Fn(&str) -> Reply + Send + Sync>;

    pub struct StubServer {
        addr: SocketAddr,
    }

    impl StubServer {
        /// Serve on an ephemeral local port; `handler` maps the request path to a reply.
        /// Each connection gets its own thread and is closed after one response.
        pub fn start(handler: impl Fn(&str) -> Reply + Send + Sync + 'static) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
            let addr = listener.local_addr().expect("stub server address");
            let handler: Handler = Arc::new(handler);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let handler = Arc::clone(&handler);
                    thread::spawn(move || serve(stream, &*handler));
                }
            });
            Self { addr }
        }

        /// API base URL, e.g. `http://127.0.0.1:41234/v1`
        pub fn base_url(&self) -> String {
            format!("http://{}/v1", self.addr)
        }
    }

    fn serve(stream: TcpStream, handler: &(dyn Fn(&str) -> Reply + Send + Sync)) {
        let mut reader = BufReader::new(match stream.try_clone() {
            Ok(s) => s,
            Err(_) => return,
        });

        let mut request_line = String::new();
        if reader.read_line(&mut request_line).is_err() {
            return;
        }
        let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => return,
                Ok(_) => {}
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0u8; content_length];
        if reader.read_exact(&mut body).is_err() {
            return;
        }

        let reply = handler(&path);
        thread::sleep(reply.delay);
        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            reply.status,
            reply.body.len(),
            reply.body
        );
        let mut stream = stream;
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    }
}
