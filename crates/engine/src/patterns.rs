//! Static operation pattern tables grouped by node category.
//!
//! A category applies when one of its tokens appears (case-sensitively) in the
//! node type. Several categories may apply to one node; the generic table is
//! always appended last.

/// A recognizable fragment of a mistyped operation and the operation it
/// usually stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEntry {
    pub pattern: &'static str,
    pub suggestion: &'static str,
}

const fn entry(pattern: &'static str, suggestion: &'static str) -> PatternEntry {
    PatternEntry { pattern, suggestion }
}

struct PatternCategory {
    tokens: &'static [&'static str],
    entries: &'static [PatternEntry],
}

const STORAGE_PATTERNS: &[PatternEntry] = &[
    entry("listFiles", "search"),
    entry("listFolders", "search"),
    entry("getFiles", "search"),
    entry("getFile", "download"),
    entry("downloadFile", "download"),
    entry("uploadFile", "upload"),
    entry("removeFile", "deleteFile"),
    entry("copyFile", "copy"),
    entry("moveFile", "move"),
    entry("shareFile", "share"),
];

const MESSAGING_PATTERNS: &[PatternEntry] = &[
    entry("sendMessage", "send"),
    entry("sendMessage", "post"),
    entry("postMessage", "post"),
    entry("postMessage", "send"),
    entry("getMessage", "get"),
    entry("readMessage", "get"),
    entry("editMessage", "update"),
    entry("updateMessage", "update"),
    entry("deleteMessage", "delete"),
    entry("removeMessage", "delete"),
];

const DATABASE_PATTERNS: &[PatternEntry] = &[
    entry("selectRows", "select"),
    entry("getRows", "select"),
    entry("readRows", "select"),
    entry("insertRow", "insert"),
    entry("addRow", "insert"),
    entry("updateRow", "update"),
    entry("upsertRow", "upsert"),
    entry("deleteRows", "delete"),
    entry("runQuery", "executeQuery"),
    entry("query", "executeQuery"),
];

const HTTP_PATTERNS: &[PatternEntry] = &[
    entry("fetch", "GET"),
    entry("download", "GET"),
    entry("submit", "POST"),
    entry("post", "POST"),
    entry("replace", "PUT"),
    entry("patch", "PATCH"),
    entry("remove", "DELETE"),
];

const GENERIC_PATTERNS: &[PatternEntry] = &[
    entry("getAll", "list"),
    entry("fetch", "get"),
    entry("add", "create"),
    entry("modify", "update"),
    entry("remove", "delete"),
    entry("find", "search"),
];

const CATEGORIES: &[PatternCategory] = &[
    PatternCategory {
        tokens: &["googleDrive", "dropbox", "OneDrive"],
        entries: STORAGE_PATTERNS,
    },
    PatternCategory {
        tokens: &["slack", "discord", "telegram", "mattermost"],
        entries: MESSAGING_PATTERNS,
    },
    PatternCategory {
        tokens: &["postgres", "mySql", "mongoDb", "microsoftSql", "database"],
        entries: DATABASE_PATTERNS,
    },
    PatternCategory {
        tokens: &["httpRequest"],
        entries: HTTP_PATTERNS,
    },
];

/// Returns every pattern entry that applies to `node_type`, generic entries last.
pub fn get_node_patterns(node_type: &str) -> Vec<PatternEntry> {
    let mut patterns: Vec<PatternEntry> = CATEGORIES
        .iter()
        .filter(|category| category.tokens.iter().any(|token| node_type.contains(token)))
        .flat_map(|category| category.entries.iter().copied())
        .collect();
    patterns.extend_from_slice(GENERIC_PATTERNS);
    patterns
}
