//! The built-in signature table (spec.md §4.5), process-wide read-only data,
//! grounded on `riptide-stealth::detection`'s approach to bundling named
//! checks together, here declared once via `once_cell::sync::Lazy` the way
//! `riptide-config`'s env defaults are (see SPEC_FULL.md §4.5).

use once_cell::sync::Lazy;

use lynxget_types::{
    antibot::{ContentPattern, ContentPatternKind, NamePattern, NamedPattern, WindowPattern},
    DetectionCategory, Signature, SuggestedAction,
};

fn named(pattern: NamePattern, confidence: u8) -> NamedPattern {
    NamedPattern { pattern, confidence }
}

fn substring(s: &str, confidence: u8) -> NamedPattern {
    named(NamePattern::Substring(s.to_string()), confidence)
}

fn content(pattern: ContentPatternKind, confidence: u8, description: &str) -> ContentPattern {
    ContentPattern { pattern, confidence, description: description.to_string() }
}

fn window(path: &str, confidence: u8) -> WindowPattern {
    WindowPattern { path: path.to_string(), confidence }
}

pub static SIGNATURES: Lazy<Vec<Signature>> = Lazy::new(|| {
    vec![
        Signature {
            id: "cloudflare".to_string(),
            name: "Cloudflare".to_string(),
            category: DetectionCategory::Antibot,
            suggested_action: SuggestedAction::RetryTls,
            cookie_patterns: vec![substring("__cf_bm", 100), substring("cf_clearance", 100)],
            header_patterns: vec![substring("cf-ray", 100), substring("cf-mitigated", 100)],
            content_patterns: vec![
                content(ContentPatternKind::Substring("Checking your browser before accessing".to_string()), 85, "Cloudflare interstitial copy"),
                content(ContentPatternKind::Substring("cf-browser-verification".to_string()), 85, "Cloudflare JS challenge element"),
            ],
            window_patterns: vec![window("__CF$cv$params", 80)],
        },
        Signature {
            id: "akamai".to_string(),
            name: "Akamai Bot Manager".to_string(),
            category: DetectionCategory::Antibot,
            suggested_action: SuggestedAction::RetryHeaders,
            cookie_patterns: vec![substring("_abck", 90), substring("ak_bmsc", 80)],
            header_patterns: vec![substring("x-akamai-transformed", 85)],
            content_patterns: vec![content(
                ContentPatternKind::Substring("akamai".to_string()),
                50,
                "Akamai reference in page body",
            )],
            window_patterns: vec![window("bmak", 80)],
        },
        Signature {
            id: "datadome".to_string(),
            name: "DataDome".to_string(),
            category: DetectionCategory::Antibot,
            suggested_action: SuggestedAction::RetryHeaders,
            cookie_patterns: vec![substring("datadome", 95)],
            header_patterns: vec![substring("x-datadome", 95)],
            content_patterns: vec![content(
                ContentPatternKind::Substring("geo.captcha-delivery.com".to_string()),
                90,
                "DataDome CAPTCHA delivery host",
            )],
            window_patterns: vec![],
        },
        Signature {
            id: "perimeterx".to_string(),
            name: "PerimeterX / HUMAN".to_string(),
            category: DetectionCategory::Antibot,
            suggested_action: SuggestedAction::RetryHeaders,
            cookie_patterns: vec![substring("_px", 85), substring("_pxvid", 80)],
            header_patterns: vec![substring("x-px-block-reason", 90)],
            content_patterns: vec![content(
                ContentPatternKind::Substring("px-captcha".to_string()),
                90,
                "PerimeterX CAPTCHA container",
            )],
            window_patterns: vec![window("_pxAppId", 75)],
        },
        Signature {
            id: "recaptcha".to_string(),
            name: "Google reCAPTCHA".to_string(),
            category: DetectionCategory::Captcha,
            suggested_action: SuggestedAction::SolveCaptcha,
            cookie_patterns: vec![],
            header_patterns: vec![],
            content_patterns: vec![
                content(ContentPatternKind::Substring("www.google.com/recaptcha".to_string()), 95, "reCAPTCHA script tag"),
                content(ContentPatternKind::Substring("g-recaptcha".to_string()), 85, "reCAPTCHA container class"),
            ],
            window_patterns: vec![window("grecaptcha", 85)],
        },
        Signature {
            id: "hcaptcha".to_string(),
            name: "hCaptcha".to_string(),
            category: DetectionCategory::Captcha,
            suggested_action: SuggestedAction::SolveCaptcha,
            cookie_patterns: vec![],
            header_patterns: vec![],
            content_patterns: vec![content(
                ContentPatternKind::Substring("hcaptcha.com".to_string()),
                90,
                "hCaptcha script reference",
            )],
            window_patterns: vec![window("hcaptcha", 85)],
        },
        Signature {
            id: "webdriver-fingerprint".to_string(),
            name: "Webdriver automation fingerprint".to_string(),
            category: DetectionCategory::Fingerprint,
            suggested_action: SuggestedAction::Unknown,
            cookie_patterns: vec![],
            header_patterns: vec![],
            content_patterns: vec![],
            window_patterns: vec![window("navigator.webdriver", 95)],
        },
        Signature {
            id: "imperva".to_string(),
            name: "Imperva / Incapsula".to_string(),
            category: DetectionCategory::BotDetection,
            suggested_action: SuggestedAction::RetryHeaders,
            cookie_patterns: vec![substring("incap_ses", 85), substring("visid_incap", 80)],
            header_patterns: vec![substring("x-iinfo", 85)],
            content_patterns: vec![content(
                ContentPatternKind::Substring("Incapsula incident ID".to_string()),
                95,
                "Incapsula block page text",
            )],
            window_patterns: vec![],
        },
    ]
});
