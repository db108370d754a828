//! Randomized browser-like request headers
//!
//! Every fetch attempt asks a [`HeaderGenerator`] for a fresh header set so
//! consecutive requests do not share one fingerprint.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Produces a header name → value mapping for one request
pub trait HeaderGenerator: Send + Sync {
    fn generate(&self) -> HashMap<String, String>;
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

const ACCEPT: &[&str] = &[
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
];

const ACCEPT_LANGUAGE: &[&str] = &[
    "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7",
    "fr-FR,fr;q=0.8,en;q=0.5",
    "en-US,en;q=0.9,fr;q=0.8",
    "fr,fr-FR;q=0.9,en;q=0.6",
];

/// Picks a plausible desktop browser header set at random
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomHeaders;

impl RandomHeaders {
    pub fn new() -> Self {
        Self
    }
}

impl HeaderGenerator for RandomHeaders {
    fn generate(&self) -> HashMap<String, String> {
        let mut rng = rand::thread_rng();
        let mut headers = HashMap::new();

        if let Some(agent) = USER_AGENTS.choose(&mut rng) {
            headers.insert("User-Agent".to_string(), agent.to_string());
        }
        if let Some(accept) = ACCEPT.choose(&mut rng) {
            headers.insert("Accept".to_string(), accept.to_string());
        }
        if let Some(language) = ACCEPT_LANGUAGE.choose(&mut rng) {
            headers.insert("Accept-Language".to_string(), language.to_string());
        }
        if rng.gen_bool(0.5) {
            headers.insert("DNT".to_string(), "1".to_string());
        }
        if rng.gen_bool(0.5) {
            headers.insert("Upgrade-Insecure-Requests".to_string(), "1".to_string());
        }

        headers
    }
}
