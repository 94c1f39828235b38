//! Field mapper: raw nested JSON record → flat row.
//!
//! One generic resolver evaluates the declarative flatten rules from the
//! entity's [`SyncTarget`], replacing per-field null-guard chains. The mapper
//! is total: any missing, null, or non-scalar data resolves to a null column,
//! and the output always carries exactly the declared column set.

use crate::target::{FieldPath, SyncTarget};
use crate::value::{FieldValue, FlatRecord};

/// Flatten one raw API record into a row for the target's table.
pub fn flatten(raw: &serde_json::Value, target: &SyncTarget) -> FlatRecord {
    FlatRecord::new(
        target
            .columns
            .iter()
            .map(|column| (column.name, resolve(raw, &column.source)))
            .collect(),
    )
}

fn resolve(raw: &serde_json::Value, path: &FieldPath) -> FieldValue {
    let value = match path {
        FieldPath::Key(key) => raw.get(key),
        FieldPath::Nested(object, key) => raw.get(object).and_then(|inner| inner.get(key)),
        FieldPath::ListHead(list, key) => raw
            .get(list)
            .and_then(serde_json::Value::as_array)
            .and_then(|items| items.first())
            .and_then(|head| head.get(key)),
    };
    value.map_or(FieldValue::Null, FieldValue::from_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target;
    use serde_json::json;

    fn tickets_target() -> SyncTarget {
        target::tickets(
            "https://example.acelerato.com/api".to_string(),
            "02/04/2025".to_string(),
        )
    }

    #[test]
    fn test_flatten_always_yields_declared_column_set() {
        let target = tickets_target();
        let record = flatten(&json!({}), &target);
        assert_eq!(record.len(), target.columns.len());
        for column in &target.columns {
            assert_eq!(record.get(column.name), Some(&FieldValue::Null));
        }
    }

    #[test]
    fn test_flatten_null_nested_object_resolves_to_null() {
        let target = tickets_target();
        let raw = json!({"ticketKey": 42, "organizacao": null});
        let record = flatten(&raw, &target);
        assert_eq!(record.get("ticketKey"), Some(&FieldValue::Int(42)));
        assert_eq!(record.get("organizacaoKey"), Some(&FieldValue::Null));
        assert_eq!(record.get("organizacaonome"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_flatten_nested_lookup() {
        let target = tickets_target();
        let raw = json!({
            "ticketKey": 7,
            "titulo": "impressora parada",
            "arquivado": false,
            "kanbanStatus": {
                "kanbanStatusKey": 3,
                "descricao": "Em andamento",
                "inicio": false,
                "fim": false,
                "fila": true
            },
            "agente": {"usuarioKey": 12, "nome": "Ana", "email": "ana@example.com"}
        });
        let record = flatten(&raw, &target);
        assert_eq!(record.get("kanbanStatusKey"), Some(&FieldValue::Int(3)));
        assert_eq!(
            record.get("kanbanStatusdescricao"),
            Some(&FieldValue::Text("Em andamento".to_string()))
        );
        assert_eq!(record.get("kanbanStatusfila"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("agenteUsuarioKey"), Some(&FieldValue::Int(12)));
        assert_eq!(record.get("arquivado"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_flatten_list_head_extraction() {
        let target = target::feedbacks(
            "https://example.acelerato.com/api".to_string(),
            "02/04/2025".to_string(),
        );
        let raw = json!({
            "ticketId": 99,
            "avaliacaoMedia": 4.5,
            "perguntas": [
                {"pergunta": "Como foi o atendimento?", "nota": 5, "status": "RESPONDIDA"},
                {"pergunta": "Recomendaria?", "nota": 3}
            ]
        });
        let record = flatten(&raw, &target);
        assert_eq!(
            record.get("pergunta"),
            Some(&FieldValue::Text("Como foi o atendimento?".to_string()))
        );
        assert_eq!(record.get("nota"), Some(&FieldValue::Int(5)));
        assert_eq!(
            record.get("statusPergunta"),
            Some(&FieldValue::Text("RESPONDIDA".to_string()))
        );
        assert_eq!(record.get("avaliacaoMedia"), Some(&FieldValue::Float(4.5)));
    }

    #[test]
    fn test_flatten_empty_or_absent_list_resolves_to_null() {
        let target = target::time_entries(
            "https://example.acelerato.com/api".to_string(),
            "01/04/2025".to_string(),
        );
        let with_empty = flatten(&json!({"requestUUID": "abc", "links": []}), &target);
        assert_eq!(with_empty.get("link_href"), Some(&FieldValue::Null));

        let without = flatten(&json!({"requestUUID": "abc"}), &target);
        assert_eq!(without.get("link_href"), Some(&FieldValue::Null));

        let with_link = flatten(
            &json!({"requestUUID": "abc", "links": [{"href": "https://x/1"}]}),
            &target,
        );
        assert_eq!(
            with_link.get("link_href"),
            Some(&FieldValue::Text("https://x/1".to_string()))
        );
    }

    #[test]
    fn test_flatten_never_fails_on_malformed_record() {
        let target = tickets_target();
        // scalar where an object is expected, and vice versa
        let raw = json!({
            "ticketKey": {"unexpected": true},
            "organizacao": "not-an-object",
            "titulo": ["not", "a", "string"]
        });
        let record = flatten(&raw, &target);
        assert_eq!(record.get("ticketKey"), Some(&FieldValue::Null));
        assert_eq!(record.get("organizacaoKey"), Some(&FieldValue::Null));
        assert_eq!(record.get("titulo"), Some(&FieldValue::Null));
        assert_eq!(record.len(), target.columns.len());
    }
}
