//! Tech stack normalization: maps free-text skill names to canonical icon keys.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Key returned for any name missing from the alias table.
pub const UNKNOWN_TECH: &str = "tech";

const DEVICON_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon/icons";
const FALLBACK_ICON_URL: &str = "/tech.svg";

/// Alias → canonical key. Aliases are lowercase; matching is exact after trim + lowercase.
const TECH_ALIASES: &[(&str, &str)] = &[
    ("react.js", "react"),
    ("reactjs", "react"),
    ("react", "react"),
    ("next.js", "nextjs"),
    ("nextjs", "nextjs"),
    ("next", "nextjs"),
    ("vue.js", "vuejs"),
    ("vuejs", "vuejs"),
    ("vue", "vuejs"),
    ("express.js", "express"),
    ("expressjs", "express"),
    ("express", "express"),
    ("node.js", "nodejs"),
    ("nodejs", "nodejs"),
    ("node", "nodejs"),
    ("mongodb", "mongodb"),
    ("mongo", "mongodb"),
    ("mongoose", "mongoose"),
    ("mysql", "mysql"),
    ("postgresql", "postgresql"),
    ("sqlite", "sqlite"),
    ("firebase", "firebase"),
    ("docker", "docker"),
    ("kubernetes", "kubernetes"),
    ("aws", "aws"),
    ("azure", "azure"),
    ("gcp", "gcp"),
    ("digitalocean", "digitalocean"),
    ("heroku", "heroku"),
    ("photoshop", "photoshop"),
    ("adobe photoshop", "photoshop"),
    ("html5", "html5"),
    ("html", "html5"),
    ("css3", "css3"),
    ("css", "css3"),
    ("sass", "sass"),
    ("scss", "sass"),
    ("less", "less"),
    ("tailwindcss", "tailwindcss"),
    ("tailwind", "tailwindcss"),
    ("bootstrap", "bootstrap"),
    ("jquery", "jquery"),
    ("typescript", "typescript"),
    ("ts", "typescript"),
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("angular.js", "angular"),
    ("angularjs", "angular"),
    ("angular", "angular"),
    ("ember.js", "ember"),
    ("emberjs", "ember"),
    ("ember", "ember"),
    ("backbone.js", "backbone"),
    ("backbonejs", "backbone"),
    ("backbone", "backbone"),
    ("nestjs", "nestjs"),
    ("graphql", "graphql"),
    ("graph ql", "graphql"),
    ("apollo", "apollo"),
    ("webpack", "webpack"),
    ("babel", "babel"),
    ("rollup.js", "rollup"),
    ("rollupjs", "rollup"),
    ("rollup", "rollup"),
    ("parcel.js", "parcel"),
    ("parceljs", "parcel"),
    ("npm", "npm"),
    ("yarn", "yarn"),
    ("git", "git"),
    ("github", "github"),
    ("gitlab", "gitlab"),
    ("bitbucket", "bitbucket"),
    ("figma", "figma"),
    ("prisma", "prisma"),
    ("redux", "redux"),
    ("flux", "flux"),
    ("redis", "redis"),
    ("selenium", "selenium"),
    ("cypress", "cypress"),
    ("jest", "jest"),
    ("mocha", "mocha"),
    ("chai", "chai"),
    ("karma", "karma"),
    ("vuex", "vuex"),
    ("nuxt.js", "nuxt"),
    ("nuxtjs", "nuxt"),
    ("nuxt", "nuxt"),
    ("strapi", "strapi"),
    ("wordpress", "wordpress"),
    ("contentful", "contentful"),
    ("netlify", "netlify"),
    ("vercel", "vercel"),
    ("aws amplify", "amplify"),
];

static ALIAS_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| TECH_ALIASES.iter().copied().collect());

/// Returns the canonical icon key for a skill name, or `UNKNOWN_TECH`.
/// No partial or fuzzy matching.
pub fn normalize_tech_name(raw: &str) -> &'static str {
    let key = raw.trim().to_lowercase();
    ALIAS_TABLE.get(key.as_str()).copied().unwrap_or(UNKNOWN_TECH)
}

/// A skill name as entered, paired with the icon to display for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechIcon {
    pub tech: String,
    pub url: String,
}

pub fn tech_icon(raw: &str) -> TechIcon {
    let url = match normalize_tech_name(raw) {
        UNKNOWN_TECH => FALLBACK_ICON_URL.to_string(),
        key => format!("{DEVICON_BASE_URL}/{key}/{key}-original.svg"),
    };
    TechIcon {
        tech: raw.to_string(),
        url,
    }
}

pub fn tech_icons(techstack: &[String]) -> Vec<TechIcon> {
    techstack.iter().map(|t| tech_icon(t)).collect()
}
