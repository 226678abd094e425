use std::{collections::HashMap, sync::OnceLock};

use unicode_normalization::UnicodeNormalization;

/// Canonical identifier -> known aliases, all matched case-insensitively.
/// The table is literal and inverted once on first use; unknown skills never
/// fail, they fall through to a synthetic identifier.
const ALIAS_TABLE: &[(&str, &[&str])] = &[
	("aws", &["amazon web services"]),
	("cplusplus", &["c++", "cpp"]),
	("csharp", &["c#", "c sharp"]),
	("dotnet", &[".net", "dot net"]),
	("gcp", &["google cloud", "google cloud platform"]),
	("golang", &["go"]),
	("graphql", &["graph ql"]),
	("javascript", &["js", "java script", "ecmascript"]),
	("kubernetes", &["k8s"]),
	("machinelearning", &["ml", "machine learning"]),
	("mongodb", &["mongo", "mongo db"]),
	("nextjs", &["next", "next.js", "next js"]),
	("nodejs", &["node", "node.js", "node js"]),
	("postgresql", &["postgres", "postgre sql", "psql"]),
	("python", &["py", "python3"]),
	("react", &["react.js", "react js", "reactjs"]),
	("reactnative", &["react native", "react-native"]),
	("typescript", &["ts", "type script"]),
	("uiux", &["ui ux", "ui/ux", "ux/ui"]),
	("vuejs", &["vue", "vue.js", "vue js"]),
];

/// Identifiers whose display form is not plain capitalization.
const DISPLAY_EXCEPTIONS: &[(&str, &str)] = &[
	("aws", "AWS"),
	("cplusplus", "C++"),
	("csharp", "C#"),
	("css", "CSS"),
	("devops", "DevOps"),
	("dotnet", ".NET"),
	("gcp", "GCP"),
	("golang", "Go"),
	("graphql", "GraphQL"),
	("html", "HTML"),
	("ios", "iOS"),
	("javascript", "JavaScript"),
	("machinelearning", "Machine Learning"),
	("mongodb", "MongoDB"),
	("mysql", "MySQL"),
	("nextjs", "Next.js"),
	("nodejs", "Node.js"),
	("php", "PHP"),
	("postgresql", "PostgreSQL"),
	("reactnative", "React Native"),
	("seo", "SEO"),
	("sql", "SQL"),
	("typescript", "TypeScript"),
	("uiux", "UI/UX"),
	("vuejs", "Vue.js"),
];

fn alias_lookup() -> &'static HashMap<&'static str, &'static str> {
	static LOOKUP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

	LOOKUP.get_or_init(|| {
		let mut map = HashMap::new();

		for (canonical, aliases) in ALIAS_TABLE {
			map.insert(*canonical, *canonical);

			for alias in *aliases {
				map.insert(*alias, *canonical);
			}
		}

		map
	})
}

fn display_lookup() -> &'static HashMap<&'static str, &'static str> {
	static LOOKUP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

	LOOKUP.get_or_init(|| DISPLAY_EXCEPTIONS.iter().copied().collect())
}

/// Maps a free-text skill name to its canonical identifier: NFKC fold, trim,
/// lowercase, alias lookup; on a miss the lowercased input stripped to its
/// alphanumeric characters becomes a synthetic identifier.
pub fn to_canonical(name: &str) -> String {
	let folded = name.nfkc().collect::<String>().trim().to_lowercase();

	if let Some(canonical) = alias_lookup().get(folded.as_str()) {
		return (*canonical).to_string();
	}

	folded.chars().filter(|ch| ch.is_alphanumeric()).collect()
}

/// Human display form for a canonical identifier. Known branded or acronym
/// identifiers come from the exceptions table; everything else gets its first
/// letter capitalized.
pub fn display_name(id: &str) -> String {
	if let Some(display) = display_lookup().get(id) {
		return (*display).to_string();
	}

	let mut chars = id.chars();

	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resolves_known_aliases() {
		assert_eq!(to_canonical("React.js"), "react");
		assert_eq!(to_canonical("  Next.js "), "nextjs");
		assert_eq!(to_canonical("K8S"), "kubernetes");
		assert_eq!(to_canonical("amazon web services"), "aws");
	}

	#[test]
	fn synthesizes_unknown_identifiers() {
		assert_eq!(to_canonical("Rust"), "rust");
		assert_eq!(to_canonical("Ruby on Rails!"), "rubyonrails");
	}

	#[test]
	fn canonicalization_is_idempotent() {
		for (canonical, _) in ALIAS_TABLE {
			assert_eq!(to_canonical(canonical), *canonical);
		}

		let synthetic = to_canonical("Ruby on Rails");

		assert_eq!(to_canonical(&synthetic), synthetic);
	}

	#[test]
	fn display_names_use_exceptions() {
		assert_eq!(display_name("nextjs"), "Next.js");
		assert_eq!(display_name("csharp"), "C#");
		assert_eq!(display_name("rust"), "Rust");
		assert_eq!(display_name(""), "");
	}
}
