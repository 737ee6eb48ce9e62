//! Syntax reference and a catalog of ready-made patterns.

pub struct Entry {
    pub syntax: &'static str,
    pub meaning: &'static str,
}

pub struct Section<T: 'static> {
    pub title: &'static str,
    pub entries: &'static [T],
}

pub struct CommonPattern {
    pub name: &'static str,
    pub pattern: &'static str,
}

const fn e(syntax: &'static str, meaning: &'static str) -> Entry {
    Entry { syntax, meaning }
}

const fn p(name: &'static str, pattern: &'static str) -> CommonPattern {
    CommonPattern { name, pattern }
}

pub static SYNTAX: &[Section<Entry>] = &[
    Section {
        title: "Character classes",
        entries: &[
            e(".", "Any single character except a line break."),
            e("\\d", "Any digit, same as [0-9]."),
            e("\\D", "Any non-digit, same as [^0-9]."),
            e("\\w", "Any word character: letters, digits and underscore (Unicode aware)."),
            e("\\W", "Any non-word character."),
            e("\\s", "Any whitespace: space, tab, form feed, line breaks."),
            e("\\S", "Any non-whitespace character."),
        ],
    },
    Section {
        title: "Anchors",
        entries: &[
            e("^", "Start of the string, or of a line in multiline mode."),
            e("$", "End of the string, or of a line in multiline mode."),
            e("\\b", "Word boundary (Unicode aware)."),
            e("\\B", "Not a word boundary."),
        ],
    },
    Section {
        title: "Quantifiers",
        entries: &[
            e("*", "The previous element zero or more times."),
            e("+", "The previous element one or more times."),
            e("?", "The previous element zero or one time."),
            e("{n}", "The previous element exactly n times."),
            e("{n,}", "The previous element at least n times."),
            e("{n,m}", "The previous element between n and m times."),
            e("*? +? ?? {n,m}?", "Lazy forms: match as few repetitions as possible."),
        ],
    },
    Section {
        title: "Groups and sets",
        entries: &[
            e("(pattern)", "Capturing group, referenced as $1, $2, ... in replacements."),
            e("(?:pattern)", "Non-capturing group."),
            e("(?<name>pattern)", "Named capturing group, also numbered."),
            e("[abc]", "One of a, b or c."),
            e("[^abc]", "Any character except a, b or c."),
            e("[a-z]", "Any character in the range a to z."),
        ],
    },
    Section {
        title: "Assertions (zero width)",
        entries: &[
            e("(?=pattern)", "Positive lookahead: pattern matches to the right."),
            e("(?!pattern)", "Negative lookahead: pattern does not match to the right."),
            e("(?<=pattern)", "Positive lookbehind: pattern matches to the left."),
            e("(?<!pattern)", "Negative lookbehind: pattern does not match to the left."),
            e("(?>pattern)", "Atomic group: no backtracking into the group."),
        ],
    },
];

pub static COMMON: &[Section<CommonPattern>] = &[
    Section {
        title: "Numbers",
        entries: &[
            p("Digits", "[0-9]*"),
            p("Zero or a number not starting with zero", "(0|[1-9][0-9]*)"),
            p("Number with up to two decimals", "([1-9][0-9]*)+(\\.[0-9]{1,2})?"),
            p("Signed number with one or two decimals", "(-)?\\d+(\\.\\d{1,2})?"),
            p("Positive, negative or decimal number", "(-|\\+)?\\d+(\\.\\d+)?"),
            p("Positive real with two decimals", "[0-9]+(\\.[0-9]{2})?"),
            p("Positive real with one to three decimals", "[0-9]+(\\.[0-9]{1,3})?"),
            p("Non-zero positive integer", "[1-9]\\d*"),
            p("Non-zero negative integer", "-[1-9]\\d*"),
            p("Non-negative integer", "\\d+"),
            p("Non-positive integer", "-[1-9]\\d*|0"),
            p("Non-negative float", "\\d+(\\.\\d+)?"),
            p("Non-positive float", "((-\\d+(\\.\\d+)?)|(0+(\\.0+)?))"),
            p("Float", "(-?\\d+)(\\.\\d+)?"),
        ],
    },
    Section {
        title: "Strings",
        entries: &[
            p("Anything", "[\\w\\W]+"),
            p("Letters and digits", "[A-Za-z0-9]+"),
            p("Any 3 to 20 characters", ".{3,20}"),
            p("Letters", "[A-Za-z]+"),
            p("Uppercase letters", "[A-Z]+"),
            p("Lowercase letters", "[a-z]+"),
            p("Word characters", "\\w+"),
            p("CJK, letters, digits and underscore", "[\\u4E00-\\u9FA5A-Za-z0-9_]+"),
            p("No tilde", "[^~]+"),
            p("Double-byte characters", "[^\\x00-\\xff]"),
        ],
    },
    Section {
        title: "Time",
        entries: &[
            p("Date (loose)", "\\d{4}-\\d{1,2}-\\d{1,2}"),
            p("Month 01-09 or 1-12", "(0?[1-9]|1[0-2])"),
            p("Day of month 01-31", "((0?[1-9])|((1|2)[0-9])|30|31)"),
            p("24-hour time HH:mm:ss", "^(?:[01]\\d|2[0-3]):[0-5]\\d:[0-5]\\d$"),
            p("12-hour time hh:mm:ss", "^(?:1[0-2]|0?[1-9]):[0-5]\\d:[0-5]\\d$"),
        ],
    },
    Section {
        title: "Network",
        entries: &[
            p("URL", "(https?|ftp|file)://[-A-Za-z0-9+&@#/%?=~_|!:,.;]+[-A-Za-z0-9+&@#/%=~_|]"),
            p("IPv4 (loose)", "\\d+\\.\\d+\\.\\d+\\.\\d+"),
        ],
    },
    Section {
        title: "Other",
        entries: &[
            p("Email address", "\\w+([-+.]\\w+)*@\\w+([-.]\\w+)*\\.\\w+([-.]\\w+)*"),
            p("15 or 18 digit id", "\\d{15}|\\d{18}"),
            p("Account name", "[a-zA-Z][a-zA-Z0-9_]{4,15}"),
            p("Password starting with a letter", "[a-zA-Z]\\w{5,17}"),
            p("Postal code", "[1-9]\\d{5}(?!\\d)"),
            p("Four or five digits not after a stock label", "((?<!stock)\\b\\d{4,5})"),
        ],
    },
];

/// Plain-text rendering of the syntax reference, optionally followed by the catalog.
pub fn render(with_patterns: bool) -> String {
    let mut out = String::new();
    for section in SYNTAX {
        out.push_str(&format!("{}\n", section.title));
        for entry in section.entries {
            out.push_str(&format!("  {:<18} {}\n", entry.syntax, entry.meaning));
        }
        out.push('\n');
    }
    if with_patterns {
        for section in COMMON {
            out.push_str(&format!("{} patterns\n", section.title));
            for entry in section.entries {
                out.push_str(&format!("  {:<44} {}\n", entry.name, entry.pattern));
            }
            out.push('\n');
        }
    }
    out
}
