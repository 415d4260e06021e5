use serde_json::Value;
use thiserror::Error;

/// Outcome of a command push that did not get an `ok` reply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PushError {
    #[error("Canal não conectado")]
    NotJoined,
    #[error("Conexão encerrada antes da resposta do servidor")]
    Disconnected,
    #[error("Tempo de resposta esgotado")]
    Timeout,
    #[error("Servidor recusou o comando: {}", reason(.0))]
    Rejected(Value),
    #[error("Falha ao codificar comando: {0}")]
    Encode(String),
}

/// Servers usually answer errors with `{"reason": "..."}`; fall back to raw JSON.
fn reason(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejected_message_prefers_reason() {
        let err = PushError::Rejected(json!({"reason": "pedido duplicado"}));
        assert_eq!(err.to_string(), "Servidor recusou o comando: pedido duplicado");

        let err = PushError::Rejected(json!({"code": 7}));
        assert_eq!(err.to_string(), r#"Servidor recusou o comando: {"code":7}"#);
    }
}
