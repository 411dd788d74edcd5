//! Fast-path rule tables, one per language
//!
//! Patterns are written against normalized text (see `normalize`), so
//! Arabic patterns use folded spellings: bare alef, final ya for alef
//! maqsura, ASCII digits and commas. Free text (typed text, clipboard
//! text, file names and contents, search queries) is taken back out of the
//! original input; names looked up in tables use the folded form.

use regex::{Captures, Regex};
use serde_json::{json, Value};
use std::fmt;

use crate::capability::builtin::ids;
use crate::capability::handlers::calculator::looks_arithmetic;
use crate::core::types::{Language, Params};
use crate::matcher::normalize::Normalized;
use crate::session::{slots, SessionSnapshot};

/// Turns captures into final-form parameters, or declines the match
pub type Extractor = fn(&Matched<'_>, &SessionSnapshot) -> Option<Params>;

/// A rule's captures over normalized input
pub struct Matched<'t> {
    caps: Captures<'t>,
    input: &'t Normalized<'t>,
}

impl<'t> Matched<'t> {
    /// Group as matched, in normalized form
    pub fn folded(&self, name: &str) -> Option<&'t str> {
        self.caps
            .name(name)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    }

    /// Group as the user typed it
    pub fn verbatim(&self, name: &str) -> Option<&'t str> {
        let m = self.caps.name(name)?;
        Some(self.input.original_slice(m.start(), m.end()).trim()).filter(|s| !s.is_empty())
    }

    /// Like `verbatim`, but a group that runs to the end of the input keeps
    /// the punctuation the user ended it with
    pub fn verbatim_text(&self, name: &str) -> Option<&'t str> {
        let m = self.caps.name(name)?;
        let typed = if m.end() == self.input.as_str().len() {
            self.input.original_tail(m.start())
        } else {
            self.input.original_slice(m.start(), m.end())
        };
        Some(typed.trim()).filter(|s| !s.is_empty())
    }
}

/// How much of the input a rule must cover; also the evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    /// The entire input
    Whole,
    /// The entire input, allowing a trailing "please"
    Closed,
    /// The start of the input, up to a word boundary
    Prefix,
    /// Anywhere in the input
    Contains,
}

/// Uncompiled rule as written in a table
#[derive(Clone, Copy)]
pub struct RuleDef {
    pub name: &'static str,
    pub anchor: Anchor,
    pub pattern: &'static str,
    pub capability: &'static str,
    pub extract: Extractor,
}

const fn rule(
    name: &'static str,
    anchor: Anchor,
    pattern: &'static str,
    capability: &'static str,
    extract: Extractor,
) -> RuleDef {
    RuleDef {
        name,
        anchor,
        pattern,
        capability,
        extract,
    }
}

/// Words a closed rule accepts after its pattern, in normalized spelling
const POLITENESS: &str = "please|thanks|thank you|لو سمحت|من فضلك|لو سمحتي|الله يخليك|بليز";

/// A compiled rule
#[derive(Clone)]
pub struct Rule {
    pub name: &'static str,
    pub language: Language,
    pub anchor: Anchor,
    pub capability: &'static str,
    regex: Regex,
    extract: Extractor,
}

impl Rule {
    pub fn compile(language: Language, def: RuleDef) -> Result<Self, regex::Error> {
        let source = match def.anchor {
            Anchor::Whole => format!("(?i)^(?:{})$", def.pattern),
            Anchor::Closed => format!("(?i)^(?:{})(?:,?\\s+(?:{}))?$", def.pattern, POLITENESS),
            Anchor::Prefix => format!("(?i)^(?:{})(?:\\s.*)?$", def.pattern),
            Anchor::Contains => format!("(?i)(?:{})", def.pattern),
        };
        Ok(Self {
            name: def.name,
            language,
            anchor: def.anchor,
            capability: def.capability,
            regex: Regex::new(&source)?,
            extract: def.extract,
        })
    }

    /// Parameters if the rule matches the normalized input and its
    /// extractor accepts the captures
    pub fn apply(&self, input: &Normalized<'_>, session: &SessionSnapshot) -> Option<Params> {
        let caps = self.regex.captures(input.as_str())?;
        (self.extract)(&Matched { caps, input }, session)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("language", &self.language)
            .field("anchor", &self.anchor)
            .field("capability", &self.capability)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

// === Extraction helpers ===

fn strip_quotes(s: &str) -> &str {
    let quotes: &[char] = &['"', '\'', '“', '”', '«', '»'];
    s.trim_matches(quotes).trim()
}

fn one(key: &str, value: Value) -> Params {
    let mut p = Params::new();
    p.insert(key.into(), value);
    p
}

/// Free-text parameter, as typed
fn text_param(m: &Matched<'_>, group_name: &str, key: &str) -> Option<Params> {
    let value = strip_quotes(m.verbatim_text(group_name)?);
    (!value.is_empty()).then(|| one(key, json!(value)))
}

/// References that need the session, not a literal name
const ANAPHORA: &[&str] = &[
    "it", "that", "this", "them", "the window", "that window", "this window", "that app",
    "this app", "that page", "this page", "the same page", "ها", "هذا", "هذه", "هذي", "هاي", "هادا", "دي", "ده",
    "النافذة", "النافذه", "هذه النافذة", "الشباك", "نفس الصفحة", "نفس الصفحه", "نفس الموقع",
];

fn is_anaphor(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    ANAPHORA.iter().any(|a| *a == s)
}

/// Joiners that chain a second command onto the first
const CONJUNCTIONS: &[&str] = &[
    " and ", " then ", " after that ", " ثم ", " بعدين ", " وبعدين ", " وبعدها ", " بعدها ", " وبعد كذا ",
    " وافتح ", " وابحث ", " واكتب ", " وانسخ ", " واضغط ", " وسكر ", " واغلق ", " وخذ ",
];

fn is_compound(s: &str) -> bool {
    let s = format!(" {} ", s.to_lowercase());
    CONJUNCTIONS.iter().any(|c| s.contains(c))
}

fn slot_param(session: &SessionSnapshot, slot: &str, key: &str) -> Option<Params> {
    session.slot_str(slot).map(|v| one(key, json!(v)))
}

// === Extractors ===

fn no_params(_: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    Some(Params::new())
}

fn screenshot(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let path = match (m.verbatim("dir"), m.verbatim("name")) {
        (Some(dir), Some(name)) => format!("{}/{}", dir, strip_quotes(name)),
        (Some(dir), None) => format!("{}/screenshot", dir),
        (None, Some(name)) => strip_quotes(name).to_string(),
        (None, None) => return Some(Params::new()),
    };
    Some(one("path", json!(path)))
}

fn coordinates(m: &Matched<'_>) -> Option<(i64, i64)> {
    let x = m.folded("x")?.parse().ok()?;
    let y = m.folded("y")?.parse().ok()?;
    Some((x, y))
}

fn move_mouse(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let (x, y) = coordinates(m)?;
    let mut p = one("x", json!(x));
    p.insert("y".into(), json!(y));
    Some(p)
}

fn click(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let mut p = Params::new();
    if let Some((x, y)) = coordinates(m) {
        p.insert("x".into(), json!(x));
        p.insert("y".into(), json!(y));
    }
    let button = match m.folded("button").map(|b| b.to_lowercase()) {
        Some(b) if b == "right" || b == "يمين" => Some("right"),
        Some(b) if b == "double" || b == "مرتين" => Some("double"),
        _ => None,
    };
    if let Some(b) = button {
        p.insert("button".into(), json!(b));
    }
    Some(p)
}

fn type_text(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    text_param(m, "text", "text")
}

const KEY_NAMES: &[(&str, &str)] = &[
    ("انتر", "enter"),
    ("ادخال", "enter"),
    ("مسافة", "space"),
    ("مسافه", "space"),
    ("هروب", "escape"),
    ("حذف", "backspace"),
    ("تاب", "tab"),
];

fn press_key(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let raw = m.folded("key")?;
    let key = KEY_NAMES
        .iter()
        .find(|(ar, _)| *ar == raw)
        .map(|(_, en)| en.to_string())
        .unwrap_or_else(|| raw.to_lowercase().replace(' ', ""));
    Some(one("key", json!(key)))
}

fn copy_text(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    text_param(m, "text", "text")
}

fn path_param(m: &Matched<'_>, group_name: &str) -> Option<Params> {
    let path = strip_quotes(m.verbatim(group_name)?);
    (!path.is_empty()).then(|| one("path", json!(path)))
}

fn create_file(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let mut p = path_param(m, "path")?;
    if let Some(content) = m.verbatim_text("content") {
        p.insert("content".into(), json!(strip_quotes(content)));
    }
    Some(p)
}

fn delete_file(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    if is_anaphor(m.folded("path")?) {
        return None;
    }
    path_param(m, "path")
}

fn open_url(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    m.folded("url").map(|url| one("url", json!(url)))
}

fn web_search(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    text_param(m, "query", "query")
}

/// `s` without `suffix`, compared ASCII case-insensitively
fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    (s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(suffix)).then(|| &s[..cut])
}

fn app_name(m: &Matched<'_>) -> Option<String> {
    let raw = strip_quotes(m.folded("name")?);
    let name = [" application", " app"]
        .iter()
        .find_map(|suffix| strip_suffix_ci(raw, suffix))
        .unwrap_or(raw)
        .trim();
    (!name.is_empty() && !is_anaphor(name) && !is_compound(name)).then(|| name.to_string())
}

fn open_application(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    app_name(m).map(|name| one("name", json!(name)))
}

fn close_application(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    app_name(m).map(|name| one("name", json!(name)))
}

fn calculate(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let expr = m.folded("expr")?;
    looks_arithmetic(expr).then(|| one("expression", json!(expr)))
}

fn set_volume(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let level: i64 = m.folded("level")?.parse().ok()?;
    (level <= 100).then(|| one("level", json!(level)))
}

const TIME_WORDS: &[&str] = &[
    " today", " now", " tomorrow", " right now", " اليوم", " الان", " الحين", " هلق", " دلوقتي",
];

fn weather(m: &Matched<'_>, _: &SessionSnapshot) -> Option<Params> {
    let mut city = m.folded("city")?;
    while let Some(rest) = TIME_WORDS.iter().find_map(|w| strip_suffix_ci(city, w)) {
        city = rest.trim_end();
    }
    (!city.is_empty()).then(|| one("city", json!(city)))
}

fn close_active(_: &Matched<'_>, session: &SessionSnapshot) -> Option<Params> {
    slot_param(session, slots::ACTIVE_WINDOW, "name")
}

fn reopen_tab(_: &Matched<'_>, session: &SessionSnapshot) -> Option<Params> {
    slot_param(session, slots::ACTIVE_TAB, "url")
}

fn delete_last_file(_: &Matched<'_>, session: &SessionSnapshot) -> Option<Params> {
    slot_param(session, slots::LAST_FILE, "path")
}

// === Tables ===

use Anchor::{Closed, Contains, Prefix, Whole};

/// English rules in declaration order
pub fn english() -> Vec<RuleDef> {
    vec![
        rule(
            "screenshot",
            Whole,
            r"(?:please )?(?:(?:take|capture|grab) (?:a )?screen ?shot|screenshot)(?: of (?:the|my) screen)?(?: and save it(?: (?:in|to) (?P<dir>.+?))?(?: as (?P<name>.+))?)?",
            ids::TAKE_SCREENSHOT,
            screenshot,
        ),
        rule(
            "repeat",
            Whole,
            r"(?:please )?(?:do (?:that|it) again|repeat(?: that| it| the last (?:command|action))?|again|one more time)",
            ids::REPEAT_LAST,
            no_params,
        ),
        rule(
            "paste",
            Whole,
            r"paste(?: (?:it|that|the clipboard))?(?: here)?",
            ids::PASTE_CLIPBOARD,
            no_params,
        ),
        rule(
            "read_clipboard",
            Whole,
            r"what(?:'s| is) (?:in|on) (?:the |my )?clipboard|(?:read|show)(?: me)? (?:the |my )?clipboard",
            ids::READ_CLIPBOARD,
            no_params,
        ),
        rule(
            "time",
            Whole,
            r"(?:what(?:'s| is) the time|what time is it|(?:tell me )?the (?:current )?time|current time)(?: now| right now)?",
            ids::GET_TIME,
            no_params,
        ),
        rule(
            "get_volume",
            Whole,
            r"what(?:'s| is) the (?:current )?(?:volume|sound level)|(?:current|show(?: me)? the) volume",
            ids::GET_VOLUME,
            no_params,
        ),
        rule(
            "close_active",
            Whole,
            r"(?:close|quit|exit) (?:it|that|this|(?:that|this|the) (?:window|app))",
            ids::CLOSE_APPLICATION,
            close_active,
        ),
        rule(
            "reopen_page",
            Whole,
            r"(?:(?:re)?open|show) (?:that|the same|the last) (?:page|site|website|tab)(?: again)?|go back to (?:that|the same) (?:page|site)",
            ids::OPEN_URL,
            reopen_tab,
        ),
        rule(
            "delete_same_file",
            Whole,
            r"(?:delete|remove) (?:the same file|that file|the last file|it)",
            ids::DELETE_FILE,
            delete_last_file,
        ),
        rule(
            "move_mouse",
            Closed,
            r"move (?:the )?(?:mouse|cursor|pointer) to \(?\s*(?P<x>\d+)\s*(?:,\s*|\s+)(?P<y>\d+)\s*\)?",
            ids::MOVE_MOUSE,
            move_mouse,
        ),
        rule(
            "click",
            Closed,
            r"(?:(?P<button>left|right|double) )?click(?: at \(?\s*(?P<x>\d+)\s*(?:,\s*|\s+)(?P<y>\d+)\s*\)?)?",
            ids::CLICK,
            click,
        ),
        rule(
            "create_file",
            Closed,
            r"(?:create|make) (?:a )?(?:new )?(?:text )?file(?: called| named)? (?P<path>\S+)(?: (?:with|containing)(?: (?:the )?(?:content|text))? (?P<content>.+))?",
            ids::CREATE_FILE,
            create_file,
        ),
        rule(
            "type_text",
            Prefix,
            r"(?:type|write)(?: out)? (?P<text>.+)",
            ids::TYPE_TEXT,
            type_text,
        ),
        rule(
            "press_key",
            Closed,
            r"(?:press|hit)(?: the)? (?P<key>[\w\-]+(?: ?\+ ?[\w\-]+)*)(?: key| button)?",
            ids::PRESS_KEY,
            press_key,
        ),
        rule(
            "copy_text",
            Prefix,
            r"copy(?: the text)? (?P<text>.+)",
            ids::COPY_TO_CLIPBOARD,
            copy_text,
        ),
        rule(
            "open_url",
            Closed,
            r"(?:open|go to|visit|browse(?: to)?) (?P<url>(?:https?://)?(?:[\w-]+\.)+[a-z]{2,}(?:/\S*)?)",
            ids::OPEN_URL,
            open_url,
        ),
        rule(
            "web_search",
            Prefix,
            r"(?:search|google|look up)(?: (?:the web|the internet|online))?(?: for)? (?P<query>.+)",
            ids::WEB_SEARCH,
            web_search,
        ),
        rule(
            "open_application",
            Prefix,
            r"(?:open|launch|start|run) (?:the )?(?:app(?:lication)? )?(?P<name>.+)",
            ids::OPEN_APPLICATION,
            open_application,
        ),
        rule(
            "close_application",
            Prefix,
            r"(?:close|quit|exit|kill) (?:the )?(?:app(?:lication)? )?(?P<name>.+)",
            ids::CLOSE_APPLICATION,
            close_application,
        ),
        rule(
            "set_volume",
            Closed,
            r"(?:set|turn|change|put) (?:the )?(?:volume|sound)(?: level)? (?:to|at) (?P<level>\d+)(?: ?%| percent)?",
            ids::SET_VOLUME,
            set_volume,
        ),
        rule(
            "calculate",
            Closed,
            r"(?:calculate|compute|evaluate|what(?:'s| is)|how much is) (?P<expr>.+?)",
            ids::CALCULATE,
            calculate,
        ),
        rule(
            "delete_file",
            Prefix,
            r"(?:delete|remove) (?:the )?file (?P<path>.+)",
            ids::DELETE_FILE,
            delete_file,
        ),
        rule(
            "weather",
            Contains,
            r"(?:weather|forecast|temperature)(?: like)? (?:in|for|at) (?P<city>[\p{L}][\p{L}\s'\-]*)",
            ids::GET_WEATHER,
            weather,
        ),
    ]
}

/// Arabic rules (MSA plus Gulf, Levantine and Egyptian request forms)
pub fn arabic() -> Vec<RuleDef> {
    vec![
        rule(
            "screenshot",
            Whole,
            r"(?:(?:من فضلك|لو سمحت) )?(?:(?:خذ|خد|اخذ|التقط|سوي|ابي|ابغي|بدي|عايز|عاوز) )?(?:لي )?(?:لقط[ةه] (?:لل)?شاش[ةه]|صور[ةه] (?:لل)?شاش[ةه]|(?:صور|لقط) (?:ال)?شاش[ةه]|سكرين ?شوت)(?: و(?:احفظها|خزنها|حطها)(?: (?:في|ب) ?(?P<dir>.+?))?(?: باسم (?P<name>.+))?)?",
            ids::TAKE_SCREENSHOT,
            screenshot,
        ),
        rule(
            "repeat",
            Whole,
            r"(?:كرر|عيد|اعد)(?:ها)?(?: (?:اخر|نفس) (?:امر|عملي[ةه]))?|(?:سوها )?مر[ةه] ثاني[ةه]",
            ids::REPEAT_LAST,
            no_params,
        ),
        rule(
            "paste",
            Whole,
            r"(?:الصق|لزق)(?:ه|ها)?(?: النص)?(?: هنا)?",
            ids::PASTE_CLIPBOARD,
            no_params,
        ),
        rule(
            "read_clipboard",
            Whole,
            r"(?:(?:ما|شو|ايش|وش|ايه) )?(?:الموجود|اللي) (?:في|ب) ?الحافظ[ةه]|(?:اقرا|اعرض|ورني) (?:محتوي )?الحافظ[ةه]",
            ids::READ_CLIPBOARD,
            no_params,
        ),
        rule(
            "time",
            Whole,
            r"(?:كم الساع[ةه]|الساع[ةه] كم|(?:ما|شو|ايش|وش|قديش) الوقت)(?: الان| الحين| هلق| دلوقتي)?",
            ids::GET_TIME,
            no_params,
        ),
        rule(
            "get_volume",
            Whole,
            r"(?:(?:كم|ما|شو|وش|ايش) )?(?:هو )?مستوي (?:ال)?صوت|كم (?:ال)?صوت",
            ids::GET_VOLUME,
            no_params,
        ),
        rule(
            "close_active",
            Whole,
            r"(?:سكر|اغلق|قفل|اقفل)(?:ها|ه)|(?:سكر|اغلق|قفل|اقفل) (?:هذه|هذي|هاي|دي) (?:النافذ[ةه]|الشباك|البرنامج|التطبيق)",
            ids::CLOSE_APPLICATION,
            close_active,
        ),
        rule(
            "reopen_page",
            Whole,
            r"(?:افتح|رجع|ارجع الي) (?:نفس|تلك|ذيك|هذيك) (?:الصفح[ةه]|الموقع)(?: مر[ةه] ثاني[ةه])?",
            ids::OPEN_URL,
            reopen_tab,
        ),
        rule(
            "delete_same_file",
            Whole,
            r"(?:احذف|امسح) (?:نفس الملف|الملف نفسه|هذا الملف|ذاك الملف)",
            ids::DELETE_FILE,
            delete_last_file,
        ),
        rule(
            "move_mouse",
            Closed,
            r"(?:حرك|ودي|انقل) (?:ال)?(?:ماوس|فار[ةه]|مؤشر|موشر) (?:الي|ل|علي) ?\(?\s*(?P<x>\d+)\s*(?:,\s*|\s+)(?P<y>\d+)\s*\)?",
            ids::MOVE_MOUSE,
            move_mouse,
        ),
        rule(
            "press_key",
            Closed,
            r"(?:اضغط|دوس|اكبس) (?:علي )?(?:زر|مفتاح|زرار) (?P<key>[\w\-]+(?: ?\+ ?[\w\-]+)*)",
            ids::PRESS_KEY,
            press_key,
        ),
        rule(
            "click",
            Closed,
            r"(?:انقر|كليك|اضغط)(?: (?P<button>مرتين|يمين))?(?: (?:في|علي|عند) \(?\s*(?P<x>\d+)\s*(?:,\s*|\s+)(?P<y>\d+)\s*\)?)?",
            ids::CLICK,
            click,
        ),
        rule(
            "create_file",
            Closed,
            r"(?:(?:انشئ|انشي|اعمل|سوي|جهز)(?: لي)?|ابي|ابغي|بدي|عايز) (?:لي )?ملف(?: جديد)?(?: (?:اسمه|باسم|بعنوان))? (?P<path>\S+)(?: (?:و?(?:حط|اكتب) فيه|فيه|يحتوي علي|مكتوب فيه) (?P<content>.+))?",
            ids::CREATE_FILE,
            create_file,
        ),
        rule(
            "type_text",
            Prefix,
            r"(?:اكتب|اطبع)(?: النص)? (?P<text>.+)",
            ids::TYPE_TEXT,
            type_text,
        ),
        rule(
            "copy_text",
            Prefix,
            r"انسخ(?: النص)? (?P<text>.+)",
            ids::COPY_TO_CLIPBOARD,
            copy_text,
        ),
        rule(
            "open_url",
            Closed,
            r"(?:افتح|روح (?:الي|علي|ل)|ادخل (?:علي|الي)) (?:موقع )?(?P<url>(?:https?://)?(?:[\w-]+\.)+[a-z]{2,}(?:/\S*)?)",
            ids::OPEN_URL,
            open_url,
        ),
        rule(
            "web_search",
            Prefix,
            r"(?:ابحث|دور|فتش)(?: (?:في|علي) (?:الانترنت|النت|قوقل|جوجل))?(?: عن)? (?P<query>.+)",
            ids::WEB_SEARCH,
            web_search,
        ),
        rule(
            "open_application",
            Prefix,
            r"(?:افتح|شغل)(?: لي)? (?:تطبيق |برنامج )?(?P<name>.+)",
            ids::OPEN_APPLICATION,
            open_application,
        ),
        rule(
            "close_application",
            Prefix,
            r"(?:اغلق|سكر|قفل|اقفل) (?:تطبيق |برنامج )?(?P<name>.+)",
            ids::CLOSE_APPLICATION,
            close_application,
        ),
        rule(
            "set_volume",
            Closed,
            r"(?:اضبط|خل|خلي|حط|اجعل|غير) (?:مستوي )?(?:ال)?صوت (?:علي|الي|ل) ?(?P<level>\d+)(?: ?%| بالمي[ةه]| في المي[ةه])?",
            ids::SET_VOLUME,
            set_volume,
        ),
        rule(
            "calculate",
            Closed,
            r"(?:احسب(?: لي)?|كم يساوي|كم حاصل|ما ناتج|كم) (?P<expr>.+?)",
            ids::CALCULATE,
            calculate,
        ),
        rule(
            "delete_file",
            Prefix,
            r"(?:احذف|امسح) (?:ال)?ملف (?P<path>.+)",
            ids::DELETE_FILE,
            delete_file,
        ),
        rule(
            "weather",
            Contains,
            r"(?:الطقس|الجو|درج[ةه] الحرار[ةه]) (?:في |ب ?)(?P<city>[\p{L}][\p{L}\s]*)",
            ids::GET_WEATHER,
            weather,
        ),
    ]
}

/// Rule table for a language
pub fn table(language: Language) -> Vec<RuleDef> {
    match language {
        Language::English => english(),
        Language::Arabic => arabic(),
    }
}
