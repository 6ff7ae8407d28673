// 組み込みDTDLモデルパーサー
//
// DTDLの構造的なチェックのみを行う最小限のパーサーです。
// 完全なDTDLの意味検証は行いません。ModelParserトレイトの実装を差し替えることで
// 本格的なパーサーに置き換えられます。
//
// チェック内容:
// - 各テキストは1つのオブジェクト、またはオブジェクトの配列
// - インターフェースの`@id`（DTMI）、`@type`、`@context`
// - `contents`要素の`@type`と`name`、名前の重複
// - `extends`、Componentの`schema`、Relationshipの`target`による参照

use crate::core::error::ParserError;
use crate::core::model::{Dtmi, EntityInfo, EntityKind, ModelError};
use crate::services::model_parser::{EntityMap, ModelParser};
use crate::services::resolver::DtmiResolver;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;
use tracing::debug;

/// サポートする`@context`
pub const SUPPORTED_CONTEXTS: [&str; 2] = ["dtmi:dtdl:context;2", "dtmi:dtdl:context;3"];

/// リゾルバー呼び出しの最大回数
pub const MAX_RESOLUTION_ROUNDS: usize = 16;

const MAX_NAME_LENGTH: usize = 64;

const NAME_PATTERN: &str = r"^[A-Za-z](?:[A-Za-z0-9_]*[A-Za-z0-9])?$";

fn name_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).ok()).as_ref()
}

fn is_valid_name(name: &str) -> bool {
    name.len() <= MAX_NAME_LENGTH && name_regex().is_some_and(|re| re.is_match(name))
}

/// 他のインターフェースへの参照
#[derive(Debug, Clone)]
struct Reference {
    target: Dtmi,
}

/// 解析中の状態
#[derive(Debug, Default)]
struct ParseState {
    entities: EntityMap,
    references: Vec<Reference>,
    errors: Vec<ModelError>,
}

impl ParseState {
    /// まだ定義されていない参照先（重複なし、ソート済み）
    fn unresolved(&self) -> Vec<Dtmi> {
        self.references
            .iter()
            .filter(|r| !self.entities.contains_key(&r.target))
            .map(|r| r.target.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn error(&mut self, error: ModelError) {
        self.errors.push(error);
    }
}

/// 組み込みDTDLモデルパーサー
#[derive(Debug, Clone, Default)]
pub struct DtdlModelParser {}

impl DtdlModelParser {
    /// 新しいDtdlModelParserを作成
    pub fn new() -> Self {
        Self {}
    }

    /// 1つのモデルテキストを取り込む
    fn ingest_text(&self, text: &str, state: &mut ParseState) {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                state.error(ModelError::new(format!(
                    "Model text is not valid JSON: {}",
                    e
                )));
                return;
            }
        };

        match value {
            Value::Object(obj) => self.ingest_interface(&obj, state),
            Value::Array(items) => {
                for item in &items {
                    match item {
                        Value::Object(obj) => self.ingest_interface(obj, state),
                        _ => state.error(ModelError::new(
                            "Elements of a model array must be JSON objects",
                        )),
                    }
                }
            }
            _ => state.error(ModelError::new(
                "A model must be a JSON object or an array of JSON objects",
            )),
        }
    }

    /// トップレベルのインターフェースを取り込む
    fn ingest_interface(&self, obj: &Map<String, Value>, state: &mut ParseState) {
        let id = match obj.get("@id") {
            Some(Value::String(raw)) => match raw.parse::<Dtmi>() {
                Ok(id) => id,
                Err(e) => {
                    state.error(
                        ModelError::new(e.to_string())
                            .with_primary(raw.as_str())
                            .with_property("@id"),
                    );
                    return;
                }
            },
            Some(_) => {
                state.error(ModelError::new("Property '@id' must be a string").with_property("@id"));
                return;
            }
            None => {
                state.error(
                    ModelError::new("Interface is missing required property '@id'")
                        .with_property("@id"),
                );
                return;
            }
        };
        let primary = id.to_string();

        if !has_type(obj.get("@type"), "Interface") {
            state.error(
                ModelError::new("Top-level element must have '@type' of 'Interface'")
                    .with_primary(primary.as_str())
                    .with_property("@type"),
            );
        }

        if !has_supported_context(obj.get("@context")) {
            state.error(
                ModelError::new(format!(
                    "'@context' must specify one of: {}",
                    SUPPORTED_CONTEXTS.join(", ")
                ))
                .with_primary(primary.as_str())
                .with_property("@context"),
            );
        }

        if state.entities.contains_key(&id) {
            state.error(
                ModelError::new(format!("Duplicate definition of {}", id))
                    .with_primary(primary.as_str())
                    .with_secondary(primary.as_str())
                    .with_property("@id"),
            );
            return;
        }
        state
            .entities
            .insert(id.clone(), EntityInfo::interface(id.clone()));

        if let Some(extends) = obj.get("extends") {
            match extends {
                Value::Array(items) => {
                    for item in items {
                        self.add_reference(&id, item, "extends", state);
                    }
                }
                other => self.add_reference(&id, other, "extends", state),
            }
        }

        match obj.get("contents") {
            None => {}
            Some(Value::Array(items)) => self.ingest_contents(&id, items, state),
            Some(_) => state.error(
                ModelError::new("Property 'contents' must be an array")
                    .with_primary(primary.as_str())
                    .with_property("contents"),
            ),
        }
    }

    /// `contents`の各要素を取り込む
    fn ingest_contents(&self, parent: &Dtmi, items: &[Value], state: &mut ParseState) {
        let primary = parent.to_string();
        let mut seen_names = HashSet::new();

        for item in items {
            let Value::Object(element) = item else {
                state.error(
                    ModelError::new("Elements of 'contents' must be JSON objects")
                        .with_primary(primary.as_str())
                        .with_property("contents"),
                );
                continue;
            };

            let Some(kind) = content_kind(element.get("@type")) else {
                state.error(
                    ModelError::new(
                        "Element of 'contents' must have '@type' of Property, Telemetry, Command, Relationship or Component",
                    )
                    .with_primary(primary.as_str())
                    .with_property("@type"),
                );
                continue;
            };

            let name = match element.get("name") {
                Some(Value::String(name)) => name,
                _ => {
                    state.error(
                        ModelError::new(format!(
                            "{} element of 'contents' is missing required string property 'name'",
                            kind
                        ))
                        .with_primary(primary.as_str())
                        .with_property("name"),
                    );
                    continue;
                }
            };

            if !is_valid_name(name) {
                state.error(
                    ModelError::new(format!(
                        "'{}' is not a valid name: names start with a letter, contain only letters, digits and underscores, do not end with an underscore and are at most {} characters",
                        name, MAX_NAME_LENGTH
                    ))
                    .with_primary(primary.as_str())
                    .with_property("name"),
                );
                continue;
            }

            if !seen_names.insert(name.clone()) {
                state.error(
                    ModelError::new(format!("Duplicate name '{}' in 'contents'", name))
                        .with_primary(primary.as_str())
                        .with_secondary(name.as_str())
                        .with_property("name"),
                );
                continue;
            }

            let child = match parent.child(name) {
                Ok(child) => child,
                Err(e) => {
                    state.error(
                        ModelError::new(e.to_string())
                            .with_primary(primary.as_str())
                            .with_property("name"),
                    );
                    continue;
                }
            };

            match kind {
                EntityKind::Property | EntityKind::Telemetry => {
                    if !element.contains_key("schema") {
                        state.error(
                            ModelError::new(format!(
                                "{} '{}' is missing required property 'schema'",
                                kind, name
                            ))
                            .with_primary(primary.as_str())
                            .with_secondary(child.as_str())
                            .with_property("schema"),
                        );
                    }
                }
                EntityKind::Component => match element.get("schema") {
                    Some(schema) => self.add_reference(parent, schema, "schema", state),
                    None => state.error(
                        ModelError::new(format!(
                            "Component '{}' is missing required property 'schema'",
                            name
                        ))
                        .with_primary(primary.as_str())
                        .with_secondary(child.as_str())
                        .with_property("schema"),
                    ),
                },
                EntityKind::Relationship => {
                    if let Some(target) = element.get("target") {
                        self.add_reference(parent, target, "target", state);
                    }
                }
                EntityKind::Command | EntityKind::Interface => {}
            }

            if state.entities.contains_key(&child) {
                state.error(
                    ModelError::new(format!("Duplicate definition of {}", child))
                        .with_primary(primary.as_str())
                        .with_secondary(child.as_str())
                        .with_property("name"),
                );
                continue;
            }
            state.entities.insert(
                child.clone(),
                EntityInfo::content(child, kind, name.clone(), parent.clone()),
            );
        }
    }

    /// 参照先DTMIを記録する
    ///
    /// インライン定義はサポートしないため、文字列以外はエラーになります。
    fn add_reference(&self, from: &Dtmi, value: &Value, property: &str, state: &mut ParseState) {
        match value {
            Value::String(raw) => match raw.parse::<Dtmi>() {
                Ok(target) => state.references.push(Reference { target }),
                Err(e) => state.error(
                    ModelError::new(e.to_string())
                        .with_primary(from.as_str())
                        .with_secondary(raw.as_str())
                        .with_property(property),
                ),
            },
            Value::Object(_) => state.error(
                ModelError::new(format!(
                    "Inline definitions in '{}' are not supported; reference the model by its DTMI",
                    property
                ))
                .with_primary(from.as_str())
                .with_property(property),
            ),
            _ => state.error(
                ModelError::new(format!("Property '{}' must be a DTMI string", property))
                    .with_primary(from.as_str())
                    .with_property(property),
            ),
        }
    }
}

/// `@type`が指定の型を含むかどうか（文字列または配列）
fn has_type(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(t)) => t == expected,
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(expected)),
        _ => false,
    }
}

fn has_supported_context(value: Option<&Value>) -> bool {
    let supported = |v: &Value| v.as_str().is_some_and(|s| SUPPORTED_CONTEXTS.contains(&s));
    match value {
        Some(Value::Array(items)) => items.iter().any(supported),
        Some(other) => supported(other),
        None => false,
    }
}

/// contents要素の`@type`からエンティティ種別を取得
///
/// 配列の場合（セマンティック型との併用）は最初に該当した種別を使います。
fn content_kind(value: Option<&Value>) -> Option<EntityKind> {
    match value {
        Some(Value::String(t)) => EntityKind::from_content_type(t),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .find_map(EntityKind::from_content_type),
        _ => None,
    }
}

#[async_trait]
impl ModelParser for DtdlModelParser {
    async fn parse(
        &self,
        texts: Vec<String>,
        resolver: &dyn DtmiResolver,
    ) -> Result<EntityMap, ParserError> {
        let mut state = ParseState::default();
        for text in &texts {
            self.ingest_text(text, &mut state);
        }

        let mut rounds = 0;
        loop {
            let missing = state.unresolved();
            if missing.is_empty() {
                break;
            }
            if rounds >= MAX_RESOLUTION_ROUNDS {
                return Err(ParserError::Resolution(missing));
            }
            rounds += 1;

            debug!(round = rounds, missing = missing.len(), "Resolving external references");
            let Some(extra) = resolver.resolve(&missing).await else {
                return Err(ParserError::Resolution(missing));
            };
            for text in &extra {
                self.ingest_text(text, &mut state);
            }

            // リゾルバーが何も解決しなかった場合は打ち切る
            if state.unresolved() == missing {
                return Err(ParserError::Resolution(missing));
            }
        }

        if !state.errors.is_empty() {
            return Err(ParserError::Parsing(state.errors));
        }

        debug!(entities = state.entities.len(), "Model parsing complete");
        Ok(state.entities)
    }

    fn describe(&self) -> String {
        format!("dtdl-validator structural parser {}", env!("CARGO_PKG_VERSION"))
    }
}
