use async_trait::async_trait;
use serde_json::Value;

use crate::path::key_of;
use crate::transport::{Transport, TransportError};

use super::client::{HttpMethod, RestClient};

/// One method and path of a [`RestClient`], usable as an operation's
/// transport.
///
/// The first invocation argument is the request data. `{field}` placeholders
/// in the path are filled from that argument's scalar fields.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: RestClient,
    method: HttpMethod,
    path: String,
}

impl RestTransport {
    pub fn new(client: RestClient, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            client,
            method,
            path: path.into(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn call(&self, args: Vec<Value>) -> Result<Value, TransportError> {
        let data = args.into_iter().next().filter(|value| !value.is_null());
        let path = fill_path(&self.path, data.as_ref());
        self.client.request(self.method, &path, data.as_ref()).await
    }
}

fn fill_path(template: &str, data: Option<&Value>) -> String {
    let Some(Value::Object(fields)) = data else {
        return template.to_string();
    };
    fields.iter().fold(template.to_string(), |path, (name, value)| {
        match key_of(value) {
            Some(text) => path.replace(&format!("{{{}}}", name), &text),
            None => path,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholders_take_argument_fields() {
        let data = json!({"id": 7, "name": "x"});
        assert_eq!(fill_path("/users/{id}", Some(&data)), "/users/7");
        assert_eq!(fill_path("/users/{id}", None), "/users/{id}");
        assert_eq!(fill_path("/users", Some(&json!([1]))), "/users");
    }
}
