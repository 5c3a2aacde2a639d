//! End-to-end runs over small Go projects written to a temporary directory.

use jdocgen::diagnostics::codes;
use jdocgen::{DocBuilder, JdocError, OutputFormat, ResolutionMode};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const MAIN_GO: &str = r#"// Package main wires the JSON-RPC server.
// @title Inventory API
// @version 1.2.0
// @description Stock management over JSON-RPC
// @author Jane Doe
// @tags stock, inventory
package main

func main() {}
"#;

const HANDLERS_GO: &str = r#"package handlers

import (
	m "github.com/acme/inventory/models"
	"github.com/acme/inventory/shared"
)

// Stats holds per-user counters.
type Stats struct {
	Logins int `json:"logins"` // Successful logins
}

// @Command getUser
// @Description Returns a user by id
// @Parameter id int The user id
// @Parameter verbose bool optional Include the profile
// @Result m.User The requested user
// @Error 404 User not found
func GetUser(id int, verbose bool) (m.User, error) {
	return m.User{}, nil
}

// @Command listUsers
// @Description Lists users page by page
// @Parameter page int The page number
// @Result shared.Page[m.User] One page of users
func ListUsers(page int) shared.Page[m.User] {
	return shared.Page[m.User]{}
}

// @Command userStats
// @Description Counters of a user
// @Result Stats The counters
func UserStats() Stats {
	return Stats{}
}

// @Command ping
// @Description Health check
// @Additional Always answers "pong"
func Ping() string {
	return "pong"
}
"#;

const MODELS_GO: &str = r#"package models

// User is an account.
type User struct {
	ID      int      `json:"id"`
	Name    string   `json:"name"` // Display name
	Profile *Profile `json:"profile,omitempty"`
}

// Profile describes a user.
type Profile struct {
	Bio   string `json:"bio"`
	Owner *User  `json:"-"`
}
"#;

const SHARED_GO: &str = r#"package shared

// Page is one page of results.
type Page[T any] struct {
	Items []T `json:"items"`
	Total int `json:"total"`
}
"#;

fn inventory_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "go.mod", "module github.com/acme/inventory\n\ngo 1.22\n");
    write(dir.path(), "main.go", MAIN_GO);
    write(dir.path(), "handlers/users.go", HANDLERS_GO);
    write(dir.path(), "models/user.go", MODELS_GO);
    write(dir.path(), "shared/page.go", SHARED_GO);
    dir
}

#[test]
fn test_markdown_end_to_end() {
    let dir = inventory_project();
    let out = dir.path().join("docs/API.md");

    let output = DocBuilder::new(dir.path()).output(&out).build().unwrap();
    assert_eq!(output.output_path, out);
    assert_eq!(output.command_count, 4);
    assert_eq!(output.structure_count, 4);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let md = fs::read_to_string(&out).unwrap();
    assert!(md.starts_with(
        "# Inventory API\n\nVersion: 1.2.0\n\nStock management over JSON-RPC\n\n\
         **Author:** Jane Doe\n\n**Tags:** stock, inventory\n\n"
    ));
    assert!(md.contains("## JSON-RPC 2.0 Specification"));
    assert!(md.contains(
        "## Table of Contents\n\n\
         - [getUser](#getuser)\n\
         - [listUsers](#listusers)\n\
         - [ping](#ping)\n\
         - [userStats](#userstats)\n"
    ));
    assert!(md.contains("| verbose | bool | Include the profile | No |"));
    assert!(md.contains("| result | m.User | The requested user |"));
    assert!(md.contains("| 404 | User not found |"));
    assert!(md.contains("#### shared.Page[models.User]\n\nPage is one page of results.\n\n"));
    assert!(md.contains("| Items | []models.User |  | items |"));
    assert!(md.contains("| Name | string | Display name | name |"));
    assert!(md.contains("| Owner | *User |  | Owner |"));
    assert!(md.contains("| Logins | int | Successful logins | logins |"));
    assert!(md.contains("### Additional Information:\n\nAlways answers \"pong\"\n\n"));

    // Commands are sorted and every structure of a command appears once.
    let get_user = md.find("## getUser").unwrap();
    let list_users = md.find("## listUsers").unwrap();
    let ping = md.find("## ping").unwrap();
    assert!(get_user < list_users && list_users < ping);
    let get_user_section = &md[get_user..list_users];
    assert_eq!(get_user_section.matches("#### models.User\n").count(), 1);
    assert_eq!(get_user_section.matches("#### models.Profile\n").count(), 1);
}

#[test]
fn test_json_end_to_end() {
    let dir = inventory_project();
    let out = dir.path().join("api.json");

    DocBuilder::new(dir.path())
        .output(&out)
        .format(OutputFormat::Json)
        .build()
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["project"]["title"], "Inventory API");
    assert_eq!(json["project"]["tags"], serde_json::json!(["stock", "inventory"]));

    let functions = json["functions"].as_array().unwrap();
    let commands: Vec<&str> = functions
        .iter()
        .map(|f| f["command"].as_str().unwrap())
        .collect();
    assert_eq!(commands, vec!["getUser", "listUsers", "ping", "userStats"]);

    let list_users = &functions[1];
    let keys: Vec<String> = list_users["structures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            format!(
                "{}.{}",
                s["key"]["package"].as_str().unwrap(),
                s["key"]["name"].as_str().unwrap()
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec!["shared.Page[models.User]", "models.User", "models.Profile"]
    );
    assert_eq!(list_users["structures"][0]["synthesized"], true);
    assert_eq!(list_users["structures"][1]["synthesized"], false);
}

#[test]
fn test_options_omit_rfc_and_toc() {
    let dir = inventory_project();
    let out = dir.path().join("API.md");

    DocBuilder::new(dir.path())
        .output(&out)
        .include_rfc(false)
        .toc(false)
        .build()
        .unwrap();

    let md = fs::read_to_string(&out).unwrap();
    assert!(!md.contains("JSON-RPC 2.0"));
    assert!(!md.contains("Table of Contents"));
}

const PING_GO: &str = r#"package api

// @Command ping
// @Description Health check
func Ping() {}
"#;

#[test]
fn test_missing_project_info_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api.go", PING_GO);
    let out = dir.path().join("API.md");

    let err = DocBuilder::new(dir.path()).output(&out).build().unwrap_err();
    assert!(matches!(err, JdocError::MissingProjectInfo));
    assert!(!out.exists());
}

#[test]
fn test_fallback_project_from_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api.go", PING_GO);
    write(
        dir.path(),
        "jdocgen.toml",
        "[output]\ninclude_rfc = false\n\n\
         [project]\ntitle = \"Fallback API\"\nversion = \"0.1.0\"\n\
         description = \"From configuration\"\n",
    );
    let out = dir.path().join("API.md");

    let output = DocBuilder::discover(dir.path())
        .unwrap()
        .output(&out)
        .build()
        .unwrap();
    assert_eq!(output.command_count, 1);

    let md = fs::read_to_string(&out).unwrap();
    assert!(md.starts_with("# Fallback API\n\nVersion: 0.1.0\n\nFrom configuration\n\n"));
    assert!(!md.contains("JSON-RPC 2.0"));
}

const AMBIGUOUS_HANDLER: &str = r#"// @title API
// @version 1
// @description Test
package handlers

// @Command getProfile
// @Description Returns a profile
// @Result Profile The profile
func GetProfile() {}
"#;

#[test]
fn test_strict_resolution_reports_unresolved() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "handlers/h.go", AMBIGUOUS_HANDLER);
    write(dir.path(), "models/m.go", MODELS_GO);
    let out = dir.path().join("API.md");

    let output = DocBuilder::new(dir.path()).output(&out).build().unwrap();
    assert_eq!(output.structure_count, 0);

    let unresolved: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some(codes::UNRESOLVED_TYPE))
        .collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].location(), "handlers/h.go:9:0");

    // The raw type is still rendered.
    let md = fs::read_to_string(&out).unwrap();
    assert!(md.contains("| result | Profile | The profile |"));
    assert!(!md.contains("### Data Structures:"));
}

#[test]
fn test_permissive_resolution_falls_back_by_name() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "handlers/h.go", AMBIGUOUS_HANDLER);
    write(dir.path(), "models/m.go", MODELS_GO);
    let out = dir.path().join("API.md");

    let output = DocBuilder::new(dir.path())
        .output(&out)
        .resolution(ResolutionMode::Permissive)
        .build()
        .unwrap();
    assert_eq!(output.structure_count, 2);

    let md = fs::read_to_string(&out).unwrap();
    assert!(md.contains("#### models.Profile"));
    assert!(md.contains("#### models.User"));
}

#[test]
fn test_invalid_annotations_skip_function() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "api.go",
        r#"// @title API
// @version 1
// @description Test
package api

// @Command good
// @Description Works
func Good() {}

// @Command twoResults
// @Description Too many results
// @Result int One
// @Result int Two
func TwoResults() {}

// @Command badError
// @Description Bad code
// @Error abc Not a number
func BadError() {}
"#,
    );
    let out = dir.path().join("API.md");

    let output = DocBuilder::new(dir.path()).output(&out).build().unwrap();
    assert_eq!(output.command_count, 1);
    let codes_seen: Vec<_> = output
        .diagnostics
        .iter()
        .filter_map(|d| d.code.as_deref())
        .collect();
    assert_eq!(codes_seen, vec![codes::MULTIPLE_RESULTS, codes::INVALID_ANNOTATION]);
}

#[test]
fn test_syntax_error_aborts() {
    let dir = inventory_project();
    write(dir.path(), "broken/broken.go", "package broken\n\ntype X struct {\n");
    let out = dir.path().join("API.md");

    let err = DocBuilder::new(dir.path()).output(&out).build().unwrap_err();
    assert!(matches!(err, JdocError::Parse { .. }));
    assert!(!out.exists());
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let err = DocBuilder::new(dir.path().join("nope"))
        .output(dir.path().join("API.md"))
        .build()
        .unwrap_err();
    assert!(matches!(err, JdocError::DirectoryNotFound(_)));
}

const PAIR_GO: &str = r#"// @title Pair API
// @version 1
// @description Pairs of values
package api

// User is an account.
type User struct {
	Name string `json:"name"`
}

// Item is a stock item.
type Item struct {
	SKU string `json:"sku"`
}

// Pair holds two values.
type Pair[A any, B any] struct {
	First  A `json:"first"`
	Second B `json:"second"`
}

// @Command getPair
// @Description Returns a user and an item
// @Parameter filter Pair[string, int] optional Narrow the pair
// @Result Pair[User, Item] The pair
func GetPair() {}
"#;

#[test]
fn test_spaced_generic_arguments_are_documented() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/pair.go", PAIR_GO);
    let out = dir.path().join("API.md");

    let output = DocBuilder::new(dir.path()).output(&out).build().unwrap();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(output.structure_count, 4);

    let md = fs::read_to_string(&out).unwrap();
    assert!(md.contains("| filter | Pair[string, int] | Narrow the pair | No |"));
    assert!(md.contains("| result | Pair[User, Item] | The pair |"));
    assert!(md.contains("#### api.Pair[User, Item]\n"));
    assert!(md.contains("| First | User |  | first |"));
    assert!(md.contains("| Second | Item |  | second |"));
    assert!(md.contains("#### api.User\n"));
    assert!(md.contains("#### api.Item\n"));
}

#[test]
fn test_printed_diagnostics_appear_once() {
    use jdocgen::DiagnosticsPrinter;
    use termcolor::NoColor;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "handlers/h.go", AMBIGUOUS_HANDLER);
    write(dir.path(), "models/m.go", MODELS_GO);
    let out = dir.path().join("API.md");

    let output = DocBuilder::new(dir.path()).output(&out).build().unwrap();
    let mut buf = NoColor::new(Vec::new());
    DiagnosticsPrinter::new(false)
        .write_colored(&mut buf, &output.diagnostics)
        .unwrap();
    let printed = String::from_utf8(buf.into_inner()).unwrap();

    assert_eq!(printed.matches("Profile").count(), 1, "{}", printed);
    assert!(printed.starts_with("handlers/h.go:9:0: warning[unresolved-type]: "));
}
