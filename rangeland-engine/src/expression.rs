//! Declarative expression graph submitted to the engine for evaluation.
//!
//! Nothing in this module computes anything locally. An [`Expr`] is a
//! description of a computation: a DAG of named function invocations over
//! constants, lambdas and lambda-argument references. The engine walks the
//! serialized graph and evaluates it server-side.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A node of the expression graph.
///
/// Nodes are immutable and shared through [`Arc`], so the same sub-expression
/// can feed several argument positions without duplicating the subtree.
/// Serialization follows the engine's compute API: each variant maps to its
/// wire key (`constantValue`, `functionInvocationValue`, ...), and invocation
/// arguments use a [`BTreeMap`] so the output is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal JSON value embedded in the graph.
    #[serde(rename = "constantValue")]
    Constant(serde_json::Value),
    /// A call to a named engine function with named arguments.
    #[serde(rename = "functionInvocationValue")]
    Invocation {
        /// Name of the engine function, e.g. `Image.updateMask`.
        #[serde(rename = "functionName")]
        function: String,
        /// Named argument sub-expressions.
        arguments: BTreeMap<String, Arc<Expr>>,
    },
    /// A lambda passed to mapping operations.
    #[serde(rename = "functionDefinitionValue")]
    Function {
        /// Parameter names the body may reference.
        #[serde(rename = "argumentNames")]
        params: Vec<String>,
        /// The lambda body.
        body: Arc<Expr>,
    },
    /// Reference to a parameter of an enclosing [`Expr::Function`].
    #[serde(rename = "argumentReference")]
    ArgRef(String),
    /// An ordered list of sub-expressions.
    #[serde(rename = "listValue")]
    List(Vec<Arc<Expr>>),
}

impl Expr {
    /// Creates a constant node from anything convertible to JSON.
    pub fn constant(value: impl Into<serde_json::Value>) -> Self {
        Expr::Constant(value.into())
    }

    /// Starts building an invocation of the named engine function.
    pub fn invoke(function: impl Into<String>) -> InvocationBuilder {
        InvocationBuilder {
            function: function.into(),
            arguments: BTreeMap::new(),
        }
    }

    /// Creates a reference to a lambda parameter.
    pub fn arg_ref(name: impl Into<String>) -> Self {
        Expr::ArgRef(name.into())
    }

    /// Creates a list node.
    pub fn list(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::List(items.into_iter().map(Arc::new).collect())
    }

    /// Wraps `body` into a lambda over the given parameter names.
    pub fn function(params: Vec<String>, body: Expr) -> Self {
        Expr::Function {
            params,
            body: Arc::new(body),
        }
    }

    /// Names of all invoked functions, in pre-order.
    ///
    /// Used by tests and debug logging to inspect what a handle chain
    /// actually asks the engine to do.
    pub fn ops(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_ops(&mut out);
        out
    }

    /// Returns true if the graph invokes the given function anywhere.
    pub fn invokes(&self, function: &str) -> bool {
        self.ops().contains(&function)
    }

    fn collect_ops<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Invocation {
                function,
                arguments,
            } => {
                out.push(function.as_str());
                for arg in arguments.values() {
                    arg.collect_ops(out);
                }
            }
            Expr::Function { body, .. } => body.collect_ops(out),
            Expr::List(items) => {
                for item in items {
                    item.collect_ops(out);
                }
            }
            Expr::Constant(_) | Expr::ArgRef(_) => {}
        }
    }
}

/// Builder for [`Expr::Invocation`] nodes.
#[derive(Debug)]
pub struct InvocationBuilder {
    function: String,
    arguments: BTreeMap<String, Arc<Expr>>,
}

impl InvocationBuilder {
    /// Adds a named argument.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Arc<Expr>>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Adds a constant argument.
    pub fn const_arg(self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arg(name, Expr::constant(value))
    }

    /// Finishes the invocation node.
    pub fn build(self) -> Expr {
        Expr::Invocation {
            function: self.function,
            arguments: self.arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn invocation_wire_shape() {
        let expr = Expr::invoke("Image.load")
            .const_arg("id", "LANDSAT/LC08/C02/T1_L2")
            .build();

        let serialized = serde_json::to_value(&expr).expect("serialization failed");
        assert_eq!(
            serialized,
            json!({
                "functionInvocationValue": {
                    "functionName": "Image.load",
                    "arguments": {
                        "id": { "constantValue": "LANDSAT/LC08/C02/T1_L2" }
                    }
                }
            })
        );
    }

    #[test]
    fn arguments_serialize_in_name_order() {
        let expr = Expr::invoke("Image.reproject")
            .const_arg("scale", 100)
            .const_arg("crs", "EPSG:32633")
            .build();

        let text = serde_json::to_string(&expr).expect("serialization failed");
        let crs = text.find("\"crs\"").expect("missing crs");
        let scale = text.find("\"scale\"").expect("missing scale");
        assert!(crs < scale);
    }

    #[test]
    fn ops_lists_invocations_in_pre_order() {
        let inner = Expr::invoke("Image.constant").const_arg("value", 1).build();
        let expr = Expr::invoke("Image.updateMask")
            .arg("image", inner)
            .build();

        assert_eq!(expr.ops(), vec!["Image.updateMask", "Image.constant"]);
        assert!(expr.invokes("Image.constant"));
        assert!(!expr.invokes("Image.mask"));
    }

    #[test]
    fn lambda_round_trips() {
        let body = Expr::invoke("Image.byte")
            .arg("input", Expr::arg_ref("_map_arg_0"))
            .build();
        let lambda = Expr::function(vec!["_map_arg_0".into()], body);

        let serialized = serde_json::to_string(&lambda).expect("serialization failed");
        let parsed: Expr = serde_json::from_str(&serialized).expect("deserialization failed");
        assert_eq!(parsed, lambda);
    }
}
