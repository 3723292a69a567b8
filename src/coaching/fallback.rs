//! Canned coaching answers used when the AI provider is unavailable
//!
//! Selection is a case-insensitive substring match over a fixed keyword
//! table; the first matching topic wins.

const ATTENTION_RESPONSE: &str = r#"**ध्यान आकर्षित करने के लिए / To Get Attention:**

1. **Clap Pattern**: Start a rhythm - students repeat. Simple to complex!
2. **Countdown**: Start loud "5..." get quieter "4...3...2..." whisper "1"
3. **Mystery Object**: Hide something, ask "What's in my hand?"

💡 Try the clap pattern right now - it works instantly!

*Note: AI is currently offline. Connect to internet for personalized coaching.*"#;

const ZERO_BORROWING_RESPONSE: &str = r#"**शून्य और उधार सिखाने के लिए / Teaching Zero & Borrowing:**

1. **Use Bundles**: 30 sticks in 3 bundles of 10
2. **Ask**: "Can I take 4 from nothing?" No!
3. **Open Bundle**: Unwrap a ten, now take 4 from the 10 loose ones

Key: Zero means "nothing here YET" - we can always unwrap a ten!

*Note: AI is currently offline. Connect to internet for personalized coaching.*"#;

const MULTIGRADE_RESPONSE: &str = r#"**Multi-Grade Classroom Tips:**

1. **Peer Tutoring**: Older students help younger ones (they learn by teaching!)
2. **Station Rotation**: Different activities at different corners
3. **Common Theme**: Same topic, different complexity levels

Example: All learn about "Animals" - Class 3 draws, Class 4 writes sentences.

*Note: AI is currently offline. Connect to internet for personalized coaching.*"#;

const WELCOME_RESPONSE: &str = r#"Welcome to Shikshak Saathi! 🙏

I'm your teaching companion. While I'm currently working offline, here are some general tips:

1. **Start with a hook** - A question or surprise to grab attention
2. **Use local materials** - Stones, sticks, leaves make great teaching aids
3. **Peer learning** - Let students teach each other
4. **Movement breaks** - A quick stretch refocuses the class

Connect to the internet for personalized, AI-powered coaching responses!

*क्या आप हिंदी में मदद चाहते हैं? बस हिंदी में पूछें!*"#;

/// Topic picked for a fallback answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTopic {
    /// Getting the class's attention
    Attention,
    /// Zero and borrowing in subtraction
    ZeroBorrowing,
    /// Teaching several grades at once
    Multigrade,
    /// Anything else
    Welcome,
}

const KEYWORDS: &[(FallbackTopic, &[&str])] = &[
    (FallbackTopic::Attention, &["attention", "ध्यान"]),
    (FallbackTopic::ZeroBorrowing, &["zero", "शून्य", "borrowing"]),
    (
        FallbackTopic::Multigrade,
        &["multigrade", "multi-grade", "एक साथ"],
    ),
];

impl FallbackTopic {
    /// Classify a query by keyword
    pub fn classify(query: &str) -> Self {
        let lower = query.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Self::Welcome)
    }

    /// Canned answer for the topic
    pub fn response(&self) -> &'static str {
        match self {
            Self::Attention => ATTENTION_RESPONSE,
            Self::ZeroBorrowing => ZERO_BORROWING_RESPONSE,
            Self::Multigrade => MULTIGRADE_RESPONSE,
            Self::Welcome => WELCOME_RESPONSE,
        }
    }
}

/// Deterministic fallback answer for a query
///
/// # Examples
///
/// ```
/// use shikshak_saathi::coaching::fallback_response;
///
/// assert!(fallback_response("How to get ATTENTION?").contains("Clap Pattern"));
/// ```
pub fn fallback_response(query: &str) -> &'static str {
    FallbackTopic::classify(query).response()
}
