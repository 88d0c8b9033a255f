//! Spoken language guessing over a transcription service.
//!
//! The recording is transcribed once per candidate locale. Each transcript is
//! scored by the service's confidence plus a bonus for every distinct stop
//! word of that language it contains, and the best candidate wins. Every
//! failure degrades to English.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::types::Language;
use crate::core::audio::{Waveform, encode_wav};
use crate::core::stt::{STTError, SpeechRecognizer};

/// Candidates in the order they are tried; ties keep the earlier one
pub const CANDIDATES: [Language; 5] = [
    Language::English,
    Language::Tamil,
    Language::Hindi,
    Language::Malayalam,
    Language::Telugu,
];

/// Confidence assumed when the service returns text without a score
const ASSUMED_CONFIDENCE: f64 = 0.85;

/// Bonus per distinct stop word found in a transcript
const STOP_WORD_BONUS: f64 = 0.1;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "the", "is", "a", "to", "of", "in", "and", "you", "that", "it", "he", "was", "for", "on",
    "are", "as", "with", "his", "they", "i", "at", "be", "this", "have", "from",
];

const HINDI_STOP_WORDS: &[&str] = &[
    "है", "हैं", "का", "की", "के", "और", "से", "में", "को", "पर", "इस", "कि", "जो", "नहीं", "तो",
    "ही", "एक", "मैं", "तुम", "हम", "वे", "था", "थी", "थे",
];

const TAMIL_STOP_WORDS: &[&str] = &[
    "நான்", "என்", "என்னை", "அவன்", "அவள்", "அது", "இது", "அந்த", "இந்த", "ஒரு", "இல்லை",
    "உள்ளது", "வேண்டும்", "என்று", "ஆகும்", "ஆனால்", "அல்லது",
];

const TELUGU_STOP_WORDS: &[&str] = &[
    "నేను", "నా", "నన్ను", "అతను", "ఆమె", "అది", "ఇది", "ఆ", "ఈ", "ఒక", "కాదు", "ఉంది", "కావాలి",
    "అని", "కానీ", "లేదా", "మరియు",
];

const MALAYALAM_STOP_WORDS: &[&str] = &[
    "ഞാൻ", "എന്റെ", "എന്നെ", "അവൻ", "അവൾ", "അത്", "ഇത്", "ഒരു", "അല്ല", "ഉണ്ട്", "வேண்டும்",
    "എന്ന്", "ആണ്", "പക്ഷേ", "അല്ലെങ്കിൽ",
];

fn stop_words(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => ENGLISH_STOP_WORDS,
        Language::Hindi => HINDI_STOP_WORDS,
        Language::Tamil => TAMIL_STOP_WORDS,
        Language::Telugu => TELUGU_STOP_WORDS,
        Language::Malayalam => MALAYALAM_STOP_WORDS,
    }
}

/// Number of distinct transcript tokens that are stop words of `language`
///
/// English is case-folded; other scripts are compared as written.
pub fn stop_word_matches(language: Language, transcript: &str) -> usize {
    let folded;
    let text = if language == Language::English {
        folded = transcript.to_lowercase();
        folded.as_str()
    } else {
        transcript
    };

    let lexicon = stop_words(language);
    text.split_whitespace()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|token| lexicon.contains(token))
        .count()
}

/// Result of asking the service about one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Recognized {
        language: Language,
        transcript: String,
        confidence: Option<f32>,
    },
    NoMatch(Language),
    Failed(Language, STTError),
}

impl CandidateOutcome {
    /// Confidence plus the stop word bonus, `None` unless recognized
    pub fn score(&self) -> Option<f64> {
        let CandidateOutcome::Recognized {
            language,
            transcript,
            confidence,
        } = self
        else {
            return None;
        };

        let base = match confidence {
            Some(c) => f64::from(*c),
            None if !transcript.is_empty() => ASSUMED_CONFIDENCE,
            None => 0.0,
        };
        let matches = stop_word_matches(*language, transcript);

        Some(base + STOP_WORD_BONUS * matches as f64)
    }
}

/// Pick the best scoring recognized candidate, English when none beats zero
pub fn select(outcomes: &[CandidateOutcome]) -> Language {
    let mut best = Language::English;
    let mut best_score = 0.0f64;

    for outcome in outcomes {
        if let CandidateOutcome::Recognized { language, .. } = outcome
            && let Some(score) = outcome.score()
            && score > best_score
        {
            best = *language;
            best_score = score;
        }
    }

    best
}

/// Guesses the spoken language of a recording.
#[derive(Clone)]
pub struct LanguageGuesser {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    timeout: Duration,
}

impl std::fmt::Debug for LanguageGuesser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageGuesser")
            .field(
                "recognizer",
                &self.recognizer.as_ref().map(|r| r.provider_name()),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LanguageGuesser {
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>, timeout: Duration) -> Self {
        Self {
            recognizer,
            timeout,
        }
    }

    /// Guesser that always answers English without calling anything
    pub fn disabled() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Best matching language for `waveform`; never fails
    pub async fn guess(&self, waveform: &Waveform) -> Language {
        let Some(recognizer) = &self.recognizer else {
            return Language::English;
        };

        let wav = match encode_wav(waveform) {
            Ok(wav) => wav,
            Err(e) => {
                warn!(error = %e, "Could not encode audio for language detection");
                return Language::English;
            }
        };

        let mut outcomes = Vec::with_capacity(CANDIDATES.len());
        for language in CANDIDATES {
            let outcome = self
                .try_candidate(recognizer.as_ref(), &wav, waveform.sample_rate(), language)
                .await;
            outcomes.push(outcome);
        }

        let language = select(&outcomes);
        debug!(language = %language, "Language selected");
        language
    }

    async fn try_candidate(
        &self,
        recognizer: &dyn SpeechRecognizer,
        wav: &[u8],
        sample_rate: u32,
        language: Language,
    ) -> CandidateOutcome {
        let locale = language.locale();
        let call = recognizer.recognize(wav, sample_rate, locale);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => {
                debug!(
                    locale,
                    confidence = ?result.confidence,
                    matches = stop_word_matches(language, &result.transcript),
                    "Candidate recognized"
                );
                CandidateOutcome::Recognized {
                    language,
                    transcript: result.transcript,
                    confidence: result.confidence,
                }
            }
            Ok(Err(STTError::NoSpeech)) => {
                debug!(locale, "Candidate produced no transcript");
                CandidateOutcome::NoMatch(language)
            }
            Ok(Err(e)) => {
                warn!(locale, error = %e, "Candidate recognition failed");
                CandidateOutcome::Failed(language, e)
            }
            Err(_) => {
                warn!(locale, timeout = ?self.timeout, "Candidate recognition timed out");
                CandidateOutcome::Failed(language, STTError::Timeout(self.timeout))
            }
        }
    }
}
