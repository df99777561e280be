//! Evaluation state and expression dispatch.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::trace;
use vex_error::{VimError, VimResult};
use vex_host::{EditorConfig, EditorContext, ScratchBuffer, SearchDirection};
use vex_ir::{Expression, Namespace};
use vex_value::{FuncrefData, FuncrefKind, LambdaBody, Value};

use crate::{builtins, ops};

/// A stored variable. `locked` values refuse reassignment.
#[derive(Clone, Debug)]
pub struct Variable {
    pub value: Value,
    pub locked: bool,
}

impl Variable {
    pub fn new(value: Value) -> Self {
        Variable {
            value,
            locked: false,
        }
    }
}

pub type VariableStore = FxHashMap<String, Variable>;

/// The long-lived evaluation state: global variables, the local scope stack,
/// and the `v:errors` list the `assert_*` builtins append to.
///
/// The host owns one context for the life of the process and passes
/// expressions through [`EvaluationContext::evaluate_with`]. Local scopes are
/// pushed for lambda invocations and `map()`-style string expressions, in
/// strict LIFO order.
#[derive(Debug, Default)]
pub struct EvaluationContext {
    globals: VariableStore,
    local_scopes: Vec<VariableStore>,
    errors: Vec<String>,
    next_lambda: u32,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate without an editor attached. Anything that reads the editor
    /// (cursor, registers, options) sees an empty scratch document.
    pub fn evaluate(&mut self, expression: &Expression) -> VimResult<Value> {
        let mut scratch = ScratchBuffer::from_text("");
        self.evaluate_with(expression, &mut scratch)
    }

    /// Parse and evaluate in one step. Also backs the `eval()` builtin.
    pub fn evaluate_str(&mut self, input: &str) -> VimResult<Value> {
        let mut scratch = ScratchBuffer::from_text("");
        self.evaluate_str_with(input, &mut scratch)
    }

    pub fn evaluate_str_with(
        &mut self,
        input: &str,
        editor: &mut dyn EditorContext,
    ) -> VimResult<Value> {
        let expression = vex_parse::parse(input)?;
        self.evaluate_with(&expression, editor)
    }

    /// Fully evaluate `expression` against this context and the host editor.
    pub fn evaluate_with(
        &mut self,
        expression: &Expression,
        editor: &mut dyn EditorContext,
    ) -> VimResult<Value> {
        match expression {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::Float(f) => Ok(Value::Float(*f)),
            Expression::String(s) => Ok(Value::string(s.clone())),
            Expression::Blob(bytes) => Ok(Value::blob(bytes.clone())),
            Expression::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate_with(item, editor)?);
                }
                Ok(Value::list(values))
            }
            Expression::Dictionary(entries) => {
                let mut items = IndexMap::new();
                for (key, value) in entries {
                    let key = self.evaluate_with(key, editor)?.to_vim_string()?;
                    if items.contains_key(&key) {
                        return Err(VimError::DuplicateKeyInDictionary(key));
                    }
                    let value = self.evaluate_with(value, editor)?;
                    items.insert(key, value);
                }
                Ok(Value::dictionary(items))
            }
            Expression::Option { name, .. } => Ok(evaluate_option(name, editor.config())),
            Expression::Variable { namespace, name } => {
                self.evaluate_variable(*namespace, name, editor)
            }
            Expression::EnvVariable { name } => {
                Ok(Value::string(std::env::var(name).unwrap_or_default()))
            }
            Expression::Register { name } => {
                Ok(Value::string(editor.get_register(*name).unwrap_or_default()))
            }
            Expression::FunctionCall { func, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate_with(arg, editor)?);
                }
                self.call_function(func, values, editor)
            }
            Expression::Lambda { params, body } => {
                self.next_lambda += 1;
                Ok(Value::funcref(FuncrefData {
                    name: format!("<lambda>{}", self.next_lambda),
                    kind: FuncrefKind::Lambda(Rc::new(LambdaBody {
                        params: params.clone(),
                        body: (**body).clone(),
                        captured: self.local_scopes.iter().map(snapshot_scope).collect(),
                    })),
                    arglist: Vec::new(),
                    dict: None,
                }))
            }
            Expression::Index { expression, index } => {
                let sequence = self.evaluate_with(expression, editor)?;
                let index = self.evaluate_with(index, editor)?;
                ops::index(&sequence, &index)
            }
            Expression::Slice {
                expression,
                start,
                end,
            } => {
                let sequence = self.evaluate_with(expression, editor)?;
                let start = match start {
                    Some(start) => self.evaluate_with(start, editor)?,
                    None => Value::Number(0),
                };
                let end = match end {
                    Some(end) => self.evaluate_with(end, editor)?,
                    None => Value::Number(-1),
                };
                ops::slice(&sequence, &start, &end)
            }
            Expression::Entry {
                expression,
                entry_name,
            } => {
                let dict = self.evaluate_with(expression, editor)?.expect_dict()?;
                let value = dict.borrow().get(entry_name).cloned();
                value.ok_or_else(|| VimError::KeyNotPresentInDictionary(entry_name.clone()))
            }
            Expression::FuncrefCall { expression, args } => {
                let callee = self.evaluate_with(expression, editor)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate_with(arg, editor)?);
                }
                match callee {
                    Value::Funcref(data) => self.call_funcref(&data, values, editor),
                    other => Err(VimError::InvalidExpression(format!(
                        "{} is not a Funcref",
                        other.type_name()
                    ))),
                }
            }
            Expression::MethodCall {
                expression,
                method_name,
                args,
            } => {
                let mut values = Vec::with_capacity(args.len() + 1);
                values.push(self.evaluate_with(expression, editor)?);
                for arg in args {
                    values.push(self.evaluate_with(arg, editor)?);
                }
                self.call_function(method_name, values, editor)
            }
            Expression::Unary { op, operand } => {
                let operand = self.evaluate_with(operand, editor)?;
                ops::unary(*op, &operand)
            }
            Expression::Binary { op, lhs, rhs } => {
                let lhs = self.evaluate_with(lhs, editor)?;
                let rhs = self.evaluate_with(rhs, editor)?;
                ops::binary(*op, lhs, rhs)
            }
            Expression::Comparison {
                op,
                match_case,
                lhs,
                rhs,
            } => {
                let lhs = self.evaluate_with(lhs, editor)?;
                let rhs = self.evaluate_with(rhs, editor)?;
                let config = editor.config();
                let match_case = match_case.unwrap_or(!config.ignorecase);
                Ok(Value::bool(ops::compare(
                    *op, match_case, &lhs, &rhs, &config,
                )?))
            }
            Expression::Ternary {
                condition,
                then,
                otherwise,
            } => {
                if self.evaluate_with(condition, editor)?.to_int()? != 0 {
                    self.evaluate_with(then, editor)
                } else {
                    self.evaluate_with(otherwise, editor)
                }
            }
        }
    }

    /// Assign a variable. `lock` makes the new variable constant; assigning
    /// over an existing variable with `lock` set, or over a locked variable,
    /// is an error. Funcref values may only go into capitalized names.
    pub fn set_variable(
        &mut self,
        namespace: Option<Namespace>,
        name: &str,
        value: Value,
        lock: bool,
    ) -> VimResult<()> {
        if matches!(value, Value::Funcref(_))
            && !name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        {
            return Err(VimError::FuncrefVariableNameMustStartWithACapital(
                name.to_string(),
            ));
        }

        let Some(store) = self.variable_store(namespace) else {
            return Ok(());
        };
        match store.get_mut(name) {
            Some(var) => {
                if lock {
                    return Err(VimError::CannotModifyExistingVariable);
                }
                if var.locked {
                    return Err(VimError::ValueIsLocked(name.to_string()));
                }
                var.value = value;
            }
            None => {
                store.insert(name.to_string(), Variable { value, locked: lock });
            }
        }
        Ok(())
    }

    /// Assertion messages accumulated by the `assert_*` builtins, exposed to
    /// Vimscript as `v:errors`.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn record_assertion_failure(&mut self, message: String) {
        self.errors.push(message);
    }

    pub(crate) fn push_scope(&mut self, scope: VariableStore) {
        self.local_scopes.push(scope);
    }

    pub(crate) fn pop_scope(&mut self) {
        self.local_scopes.pop();
    }

    /// Dispatch a builtin by name, enforcing its arity bounds centrally.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: Vec<Value>,
        editor: &mut dyn EditorContext,
    ) -> VimResult<Value> {
        let Some(builtin) = builtins::lookup(name) else {
            return Err(VimError::UnknownFunction(name.to_string()));
        };
        if args.len() < builtin.min_args {
            return Err(VimError::NotEnoughArgs(name.to_string()));
        }
        if args.len() > builtin.max_args {
            return Err(VimError::TooManyArgs(name.to_string()));
        }
        trace!(name, argc = args.len(), "calling builtin");
        (builtin.invoke)(self, editor, name, args)
    }

    /// Invoke a funcref value. Lambdas see their captured scopes under the
    /// argument scope; named funcrefs prepend their bound arglist and go
    /// through normal builtin dispatch.
    pub(crate) fn call_funcref(
        &mut self,
        fref: &FuncrefData,
        args: Vec<Value>,
        editor: &mut dyn EditorContext,
    ) -> VimResult<Value> {
        match &fref.kind {
            FuncrefKind::Lambda(lambda) => {
                let depth = self.local_scopes.len();
                for captured in &lambda.captured {
                    self.local_scopes.push(
                        captured
                            .iter()
                            .map(|(name, value)| (name.clone(), Variable::new(value.clone())))
                            .collect(),
                    );
                }
                let mut scope = VariableStore::default();
                for (param, arg) in lambda.params.iter().zip(args) {
                    scope.insert(param.clone(), Variable::new(arg));
                }
                self.local_scopes.push(scope);
                let result = self.evaluate_with(&lambda.body, editor);
                self.local_scopes.truncate(depth);
                result
            }
            FuncrefKind::Builtin => {
                let mut full = fref.arglist.clone();
                full.extend(args);
                self.call_function(&fref.name, full, editor)
            }
        }
    }

    fn evaluate_variable(
        &mut self,
        namespace: Option<Namespace>,
        name: &str,
        editor: &mut dyn EditorContext,
    ) -> VimResult<Value> {
        if namespace.is_none() {
            for scope in self.local_scopes.iter().rev() {
                if let Some(var) = scope.get(name) {
                    return Ok(var.value.clone());
                }
            }
        }

        match namespace {
            None | Some(Namespace::Global) => self
                .globals
                .get(name)
                .map(|var| var.value.clone())
                .ok_or_else(|| VimError::UndefinedVariable(qualified(namespace, name))),
            Some(Namespace::Vim) => self.evaluate_vim_variable(name, editor),
            Some(_) => Err(VimError::UndefinedVariable(qualified(namespace, name))),
        }
    }

    fn evaluate_vim_variable(
        &mut self,
        name: &str,
        editor: &mut dyn EditorContext,
    ) -> VimResult<Value> {
        let value = match name {
            "true" => Value::bool(true),
            "false" => Value::bool(false),
            "hlsearch" => Value::bool(editor.config().hlsearch),
            "t_number" => Value::Number(0),
            "t_string" => Value::Number(1),
            "t_func" => Value::Number(2),
            "t_list" => Value::Number(3),
            "t_dict" => Value::Number(4),
            "t_float" => Value::Number(5),
            "t_bool" => Value::Number(6),
            "t_blob" => Value::Number(10),
            "numbermax" => Value::Number(i64::MAX),
            "numbermin" => Value::Number(i64::MIN),
            "numbersize" => Value::Number(64),
            "errors" => Value::list(self.errors.iter().cloned().map(Value::String).collect()),
            "searchforward" => Value::Number(match editor.search_state() {
                Some(state) if state.direction == SearchDirection::Backward => 0,
                _ => 1,
            }),
            // v:key and v:val inside map()/filter() expressions live in
            // local scopes under their full names
            _ => return self.evaluate_variable(None, &format!("v:{name}"), editor),
        };
        Ok(value)
    }

    fn variable_store(&mut self, namespace: Option<Namespace>) -> Option<&mut VariableStore> {
        if namespace.is_none() && !self.local_scopes.is_empty() {
            return self.local_scopes.last_mut();
        }
        match namespace {
            None | Some(Namespace::Global) => Some(&mut self.globals),
            _ => None,
        }
    }
}

fn snapshot_scope(store: &VariableStore) -> FxHashMap<String, Value> {
    store
        .iter()
        .map(|(name, var)| (name.clone(), var.value.clone()))
        .collect()
}

fn qualified(namespace: Option<Namespace>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{}:{name}", ns.as_char()),
        None => name.to_string(),
    }
}

/// Only the options the engine itself consumes have values; anything else
/// reads as an empty string.
pub fn evaluate_option(name: &str, config: EditorConfig) -> Value {
    match name {
        "ignorecase" | "ic" => Value::bool(config.ignorecase),
        "smartcase" | "scs" => Value::bool(config.smartcase),
        "hlsearch" | "hls" => Value::bool(config.hlsearch),
        _ => Value::string(""),
    }
}
