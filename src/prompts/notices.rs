//! Fixed client-side notices
//!
//! Localized strings the offline engine returns instead of a coaching
//! answer. None of them are ever cached.

use crate::language::Language;

const OFFLINE_NOTICE_EN: &str = "📴 **Offline Mode**\n\nYour question has been saved. You'll get a response when back online.\n\nMeanwhile, here are some tips:\n• Try a clap pattern to get attention\n• Let students work in pairs\n• Use local materials for activities";

const OFFLINE_NOTICE_HI: &str = "📴 **ऑफ़लाइन मोड**\n\nआपका प्रश्न सहेज लिया गया है। इंटरनेट वापस आने पर उत्तर मिलेगा।\n\nइस बीच, कुछ सामान्य सुझाव:\n• ध्यान आकर्षित करने के लिए ताली का पैटर्न आज़माएं\n• छात्रों को जोड़ियों में काम करने दें\n• स्थानीय सामग्री का उपयोग करें";

const CONNECTION_FAILURE_EN: &str = "❌ Something went wrong. Please try again.";

const CONNECTION_FAILURE_HI: &str = "❌ कुछ गलत हो गया। फिर से कोशिश करें।";

/// Notice returned when a query is queued for later
pub fn offline_notice(language: Language) -> &'static str {
    language.pick(OFFLINE_NOTICE_EN, OFFLINE_NOTICE_HI)
}

/// Notice returned when the coaching API could not be reached
pub fn connection_failure_notice(language: Language) -> &'static str {
    language.pick(CONNECTION_FAILURE_EN, CONNECTION_FAILURE_HI)
}
