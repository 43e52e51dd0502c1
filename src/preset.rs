// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Shared ESLint and Prettier presets.
//!
//! Rule tables are plain JSON values, because that is what ESLint consumes.
//! A rule value is either a severity (`0`, `"off"`, `"warn"`, `"error"`, ...)
//! or an array of severity followed by rule options.
//!
//! Rule tables are merged in a fixed order: base ESLint rules, then the
//! framework rules, then the rules that conflict with Prettier. Later tables
//! win on duplicate rule names.

use crate::setup::Framework;

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Rule table, mapping rule name to rule value.
pub type RuleTable = Map<String, Value>;

fn table(value: Value) -> RuleTable {
    match value {
        Value::Object(map) => map,
        _ => RuleTable::new(),
    }
}

/// Base ESLint rules.
pub fn eslint_rules() -> RuleTable {
    table(json!({
        "semi": ["error", "never"],
        "strict": ["error", "never"],
        "generator-star-spacing": 0,
        "function-paren-newline": 0,
        "sort-imports": 0,
        "class-methods-use-this": 0,
        "no-confusing-arrow": 0,
        "linebreak-style": 0,
    }))
}

/// Rules that conflict with Prettier formatting.
pub fn prettier_conflict_rules() -> RuleTable {
    table(json!({
        "arrow-body-style": 0,
        "arrow-parens": 0,
        "object-curly-newline": 0,
        "implicit-arrow-linebreak": 0,
        "operator-linebreak": 0,
        "no-param-reassign": 2,
        "space-before-function-paren": 0,
    }))
}

/// TypeScript rules.
pub fn typescript_rules() -> RuleTable {
    table(json!({
        "@typescript-eslint/no-explicit-any": "warn",
        "@typescript-eslint/explicit-module-boundary-types": 0,
        "@typescript-eslint/no-non-null-assertion": 0,
        "@typescript-eslint/no-unused-vars": ["warn", { "argsIgnorePattern": "^_" }],
        "@typescript-eslint/no-var-requires": 0,
    }))
}

/// React rules.
pub fn react_rules() -> RuleTable {
    table(json!({
        "react/display-name": 0,
        "react/jsx-props-no-spreading": 0,
        "react/state-in-constructor": 0,
        "react/static-property-placement": 0,
        // Destructuring props collides with state of the same name.
        "react/destructuring-assignment": ["warn", "never"],
        "react/jsx-filename-extension": "off",
        "react/no-array-index-key": "warn",
        "react-hooks/rules-of-hooks": "error",
        "react-hooks/exhaustive-deps": "warn",
        "react/require-default-props": 0,
        "react/jsx-fragments": 0,
        "react/jsx-wrap-multilines": 0,
        "react/prop-types": 0,
        "react/forbid-prop-types": 0,
        "react/sort-comp": 0,
        "react/react-in-jsx-scope": 0,
        "react/jsx-one-expression-per-line": 0,
        "react/self-closing-comp": 1,
        "react/jsx-key": 1,
    }))
}

/// Vue rules, shared by Vue 2 and Vue 3.
pub fn vue_rules() -> RuleTable {
    table(json!({
        "vue/no-shared-component-data": "error",
        "vue/require-v-for-key": "error",
        "vue/jsx-uses-vars": "error",
        "vue/no-async-in-computed-properties": "error",
        "vue/no-side-effects-in-computed-properties": "error",
        "vue/no-unused-components": "warn",
        "vue/no-use-v-if-with-v-for": "warn",
        "vue/no-unused-vars": "off",
    }))
}

/// Merge rule tables in order, later tables win.
pub fn merge_rules(tables: impl IntoIterator<Item = RuleTable>) -> RuleTable {
    let mut merged = RuleTable::new();
    for table in tables {
        merged.extend(table);
    }

    merged
}

/// Render ESLint configuration object for target framework.
pub fn eslint_config(framework: Framework) -> Value {
    let mut extends = vec!["plugin:@typescript-eslint/recommended"];
    let mut plugins = vec!["@typescript-eslint"];
    let mut rules = vec![eslint_rules(), typescript_rules()];
    let mut parser = "@typescript-eslint/parser";
    let mut parser_options = json!({
        "project": "./tsconfig.json",
        "createDefaultProgram": true,
    });

    match framework {
        Framework::React => {
            extends.extend(["plugin:react/recommended", "plugin:react-hooks/recommended"]);
            plugins.extend(["react", "react-hooks"]);
            rules.push(react_rules());
        }
        Framework::Vue2 | Framework::Vue3 => {
            extends.push(match framework {
                Framework::Vue2 => "plugin:vue/recommended",
                _ => "plugin:vue/vue3-recommended",
            });
            plugins.push("vue");
            rules.push(vue_rules());
            // INVARIANT: Vue parser wraps the TypeScript parser for script blocks.
            parser = "vue-eslint-parser";
            parser_options = json!({
                "parser": "@typescript-eslint/parser",
                "extraFileExtensions": [".vue"],
                "createDefaultProgram": true,
            });
        }
        Framework::None => {}
    }

    // INVARIANT: Prettier goes last, so it can switch off formatting rules.
    extends.push("plugin:prettier/recommended");
    rules.push(prettier_conflict_rules());

    json!({
        "root": true,
        "extends": extends,
        "parser": parser,
        "plugins": plugins,
        "env": {
            "browser": true,
            "node": true,
            "es6": true,
            "mocha": true,
            "jest": true,
            "jasmine": true,
        },
        "rules": merge_rules(rules),
        "settings": {
            "import/resolver": {
                "node": { "extensions": [".js", ".ts", ".d.ts"] },
            },
            "import/parsers": {
                "@typescript-eslint/parser": [".ts", ".d.ts"],
            },
            "import/extensions": [".js", ".mjs", ".ts", ".d.ts"],
            "import/external-module-folders": ["node_modules", "node_modules/@types"],
            "polyfills": ["fetch", "Promise", "URL", "object-assign"],
        },
        "parserOptions": parser_options,
    })
}

/// Prettier options layout.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrettierOptions {
    pub semi: bool,
    pub single_quote: bool,
    pub trailing_comma: String,
    pub print_width: u32,
    pub prose_wrap: String,
    pub end_of_line: String,
    pub overrides: Vec<PrettierOverride>,
}

impl Default for PrettierOptions {
    fn default() -> Self {
        Self {
            semi: false,
            single_quote: true,
            trailing_comma: "all".into(),
            print_width: 100,
            prose_wrap: "never".into(),
            end_of_line: "lf".into(),
            overrides: vec![PrettierOverride {
                files: ".prettierrc".into(),
                options: json!({ "parser": "json" }),
            }],
        }
    }
}

/// Per-file Prettier option override.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct PrettierOverride {
    pub files: String,
    pub options: Value,
}
