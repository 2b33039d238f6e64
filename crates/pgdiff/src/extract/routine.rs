//! Functions, aggregates, operators and casts.

use super::CatalogObject;
use crate::{RawRow, Ref, Result};
use pgdiff_catalog::{Attributes, Kind, Value};

/// Render a routine signature: `name(arg, arg): return`.
///
/// Overloads differ in their argument types, so the signature is what keeps
/// them apart.
pub(crate) fn signature(
    name: &str,
    argument_types: &[String],
    returns: &Ref,
    returns_set: bool,
) -> String {
    let set = if returns_set { "setof " } else { "" };
    format!("{}({}): {}{}", name, argument_types.join(", "), set, returns)
}

/// A function, procedure, aggregate or window function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub namespace: String,
    pub name: String,
    /// `prokind`: `f` function, `p` procedure, `a` aggregate, `w` window.
    pub kind: String,
    pub owner: Ref,
    pub language: Ref,
    pub return_type: Ref,
    pub returns_set: bool,
    pub number_of_args: i64,
    pub number_of_args_with_defaults: i64,
    /// Input argument types, in declaration order.
    pub argument_types: Vec<String>,
    pub argument_modes: Option<Vec<String>>,
    pub argument_names: Option<Vec<String>>,
    pub argument_defaults: Option<String>,
    pub variadic: Ref,
    pub volatility: String,
    pub parallelism: String,
    pub is_strict: bool,
    pub is_leak_proof: bool,
    pub is_security_definer: bool,
    pub cost: f64,
    pub rows: f64,
    pub source: Option<String>,
    pub bin: Option<String>,
    pub sql_body: Option<String>,
    /// `SET` clauses attached to the function (`search_path=public`, ...).
    pub config: Option<Vec<String>>,
    pub acl: Option<Vec<String>>,
}

impl CatalogObject for Function {
    const KIND: Kind = Kind::Function;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            kind: row.text("kind")?,
            owner: row.reference("owner")?,
            language: row.reference("language")?,
            return_type: row.reference("returnType")?,
            returns_set: row.bool("returnsSet")?,
            number_of_args: row.int("numberOfArgs")?,
            number_of_args_with_defaults: row.int("numberOfArgsWithDefaults")?,
            argument_types: row.list("argumentTypes")?,
            argument_modes: row.opt_list("argumentModes")?,
            argument_names: row.opt_list("argumentNames")?,
            argument_defaults: row.opt_text("argumentDefaults")?,
            variadic: row.reference("variadic")?,
            volatility: row.text("volatility")?,
            parallelism: row.text("parallelism")?,
            is_strict: row.bool("isStrict")?,
            is_leak_proof: row.bool("isLeakProof")?,
            is_security_definer: row.bool("isSecurityDefiner")?,
            cost: row.float("cost")?,
            rows: row.float("rows")?,
            source: row.opt_text("source")?,
            bin: row.opt_text("bin")?,
            sql_body: row.opt_text("sqlBody")?,
            config: row.opt_list("config")?,
            acl: row.opt_list("acl")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        signature(&self.name, &self.argument_types, &self.return_type, self.returns_set)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("kind", &self.kind)
            .with("owner", &self.owner)
            .with("language", &self.language)
            .with("returnType", &self.return_type)
            .with("returnsSet", self.returns_set)
            .with("numberOfArgs", self.number_of_args)
            .with("numberOfArgsWithDefaults", self.number_of_args_with_defaults)
            .with("argumentTypes", Value::list(self.argument_types.iter().cloned()))
            .with("argumentModes", self.argument_modes.clone().map(Value::list))
            .with("argumentNames", self.argument_names.clone().map(Value::list))
            .with("argumentDefaults", self.argument_defaults.clone())
            .with("variadic", &self.variadic)
            .with("volatility", &self.volatility)
            .with("parallelism", &self.parallelism)
            .with("isStrict", self.is_strict)
            .with("isLeakProof", self.is_leak_proof)
            .with("isSecurityDefiner", self.is_security_definer)
            .with("cost", self.cost)
            .with("rows", self.rows)
            .with("source", self.source.clone())
            .with("bin", self.bin.clone())
            .with("sqlBody", self.sql_body.clone())
            .with("config", self.config.clone().map(Value::set))
            .with("acl", self.acl.clone().map(Value::set))
    }
}

/// The `pg_aggregate` half of an aggregate function.
///
/// Shares its identity name with the aggregate's [`Function`] record.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateDetail {
    pub namespace: String,
    pub name: String,
    pub argument_types: Vec<String>,
    pub return_type: Ref,
    /// `aggkind`: `n` normal, `o` ordered-set, `h` hypothetical-set.
    pub kind: String,
    pub number_of_direct_args: i64,
    pub transition_function: Ref,
    pub final_function: Ref,
    pub combine_function: Ref,
    pub serial_function: Ref,
    pub deserial_function: Ref,
    pub moving_transition_function: Ref,
    pub moving_inverse_function: Ref,
    pub moving_final_function: Ref,
    pub final_extra: bool,
    pub moving_final_extra: bool,
    pub final_modify: String,
    pub moving_final_modify: String,
    pub sort_operator: Ref,
    pub state_type: Ref,
    pub state_space: i64,
    pub moving_state_type: Ref,
    pub moving_state_space: i64,
    pub initial_value: Option<String>,
    pub moving_initial_value: Option<String>,
}

impl CatalogObject for AggregateDetail {
    const KIND: Kind = Kind::AggregateDetail;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            argument_types: row.list("argumentTypes")?,
            return_type: row.reference("returnType")?,
            kind: row.text("kind")?,
            number_of_direct_args: row.int("numberOfDirectArgs")?,
            transition_function: row.reference("transitionFunction")?,
            final_function: row.reference("finalFunction")?,
            combine_function: row.reference("combineFunction")?,
            serial_function: row.reference("serialFunction")?,
            deserial_function: row.reference("deserialFunction")?,
            moving_transition_function: row.reference("movingTransitionFunction")?,
            moving_inverse_function: row.reference("movingInverseFunction")?,
            moving_final_function: row.reference("movingFinalFunction")?,
            final_extra: row.bool("finalExtra")?,
            moving_final_extra: row.bool("movingFinalExtra")?,
            final_modify: row.text("finalModify")?,
            moving_final_modify: row.text("movingFinalModify")?,
            sort_operator: row.reference("sortOperator")?,
            state_type: row.reference("stateType")?,
            state_space: row.int("stateSpace")?,
            moving_state_type: row.reference("movingStateType")?,
            moving_state_space: row.int("movingStateSpace")?,
            initial_value: row.opt_text("initialValue")?,
            moving_initial_value: row.opt_text("movingInitialValue")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        signature(&self.name, &self.argument_types, &self.return_type, false)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("kind", &self.kind)
            .with("numberOfDirectArgs", self.number_of_direct_args)
            .with("transitionFunction", &self.transition_function)
            .with("finalFunction", &self.final_function)
            .with("combineFunction", &self.combine_function)
            .with("serialFunction", &self.serial_function)
            .with("deserialFunction", &self.deserial_function)
            .with("movingTransitionFunction", &self.moving_transition_function)
            .with("movingInverseFunction", &self.moving_inverse_function)
            .with("movingFinalFunction", &self.moving_final_function)
            .with("finalExtra", self.final_extra)
            .with("movingFinalExtra", self.moving_final_extra)
            .with("finalModify", &self.final_modify)
            .with("movingFinalModify", &self.moving_final_modify)
            .with("sortOperator", &self.sort_operator)
            .with("stateType", &self.state_type)
            .with("stateSpace", self.state_space)
            .with("movingStateType", &self.moving_state_type)
            .with("movingStateSpace", self.moving_state_space)
            .with("initialValue", self.initial_value.clone())
            .with("movingInitialValue", self.moving_initial_value.clone())
    }
}

/// An operator.
///
/// Named `left op right = result`; prefix operators have `-` on the left.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub namespace: String,
    pub name: String,
    /// `b` infix, `l` prefix.
    pub kind: String,
    pub owner: Ref,
    pub left: Ref,
    pub right: Ref,
    pub result: Ref,
    /// The function implementing the operator.
    pub code: Ref,
    pub commutator: Option<Ref>,
    pub negator: Option<Ref>,
    pub restriction: Ref,
    pub join: Ref,
    pub can_hash: bool,
    pub can_merge: bool,
}

impl CatalogObject for Operator {
    const KIND: Kind = Kind::Operator;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            namespace: row.text("namespace")?,
            name: row.text("name")?,
            kind: row.text("kind")?,
            owner: row.reference("owner")?,
            left: row.reference("left")?,
            right: row.reference("right")?,
            result: row.reference("result")?,
            code: row.reference("code")?,
            commutator: row.opt_reference("commutator")?,
            negator: row.opt_reference("negator")?,
            restriction: row.reference("restriction")?,
            join: row.reference("join")?,
            can_hash: row.bool("canHash")?,
            can_merge: row.bool("canMerge")?,
        })
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> String {
        format!("{} {} {} = {}", self.left, self.name, self.right, self.result)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("kind", &self.kind)
            .with("owner", &self.owner)
            .with("left", &self.left)
            .with("right", &self.right)
            .with("result", &self.result)
            .with("code", &self.code)
            .with("commutator", self.commutator.as_ref())
            .with("negator", self.negator.as_ref())
            .with("restriction", &self.restriction)
            .with("join", &self.join)
            .with("canHash", self.can_hash)
            .with("canMerge", self.can_merge)
    }
}

/// A cast between two types. Casts live outside any schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    pub source: String,
    pub target: String,
    pub function: Ref,
    /// `e` explicit, `a` assignment, `i` implicit.
    pub context: String,
    /// `f` function, `i` inout, `b` binary coercible.
    pub method: String,
}

impl CatalogObject for Cast {
    const KIND: Kind = Kind::Cast;

    fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            source: row.text("source")?,
            target: row.text("target")?,
            function: row.reference("function")?,
            context: row.text("context")?,
            method: row.text("method")?,
        })
    }

    fn namespace(&self) -> &str {
        ""
    }

    fn name(&self) -> String {
        format!("{} -> {}", self.source, self.target)
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
            .with("function", &self.function)
            .with("context", &self.context)
            .with("method", &self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawValue;

    fn make_function_row(name: &str, args: Vec<&str>, returns: &str, returns_set: bool) -> RawRow {
        RawRow::new("pg_proc")
            .with("namespace", "public")
            .with("name", name)
            .with("kind", "f")
            .with("owner", "postgres")
            .with("language", "plpgsql")
            .with("returnType", returns)
            .with("returnsSet", returns_set)
            .with("numberOfArgs", args.len() as i64)
            .with("numberOfArgsWithDefaults", 0i64)
            .with("argumentTypes", args)
            .with("argumentModes", RawValue::Null)
            .with("argumentNames", RawValue::Null)
            .with("argumentDefaults", RawValue::Null)
            .with("variadic", "-")
            .with("volatility", "v")
            .with("parallelism", "u")
            .with("isStrict", false)
            .with("isLeakProof", false)
            .with("isSecurityDefiner", false)
            .with("cost", 100i64)
            .with("rows", 0i64)
            .with("source", "begin end")
            .with("bin", RawValue::Null)
            .with("sqlBody", RawValue::Null)
            .with("config", RawValue::Null)
            .with("acl", RawValue::Null)
    }

    fn make_operator_row(left: &str, op: &str, right: &str, result: &str) -> RawRow {
        RawRow::new("pg_operator")
            .with("namespace", "public")
            .with("name", op)
            .with("kind", if left == "-" { "l" } else { "b" })
            .with("owner", "postgres")
            .with("left", left)
            .with("right", right)
            .with("result", result)
            .with("code", "int4lt")
            .with("commutator", RawValue::Null)
            .with("negator", RawValue::Null)
            .with("restriction", "-")
            .with("join", "-")
            .with("canHash", false)
            .with("canMerge", false)
    }

    fn make_aggregate_detail_row(name: &str, args: Vec<&str>, returns: &str) -> RawRow {
        RawRow::new("pg_aggregate")
            .with("namespace", "public")
            .with("name", name)
            .with("argumentTypes", args)
            .with("returnType", returns)
            .with("kind", "n")
            .with("numberOfDirectArgs", 0i64)
            .with("transitionFunction", "jsonb_delta_fn")
            .with("finalFunction", "-")
            .with("combineFunction", "-")
            .with("serialFunction", "-")
            .with("deserialFunction", "-")
            .with("movingTransitionFunction", "-")
            .with("movingInverseFunction", "-")
            .with("movingFinalFunction", "-")
            .with("finalExtra", false)
            .with("movingFinalExtra", false)
            .with("finalModify", "r")
            .with("movingFinalModify", "r")
            .with("sortOperator", "-")
            .with("stateType", "jsonb")
            .with("stateSpace", 0i64)
            .with("movingStateType", "-")
            .with("movingStateSpace", 0i64)
            .with("initialValue", RawValue::Null)
            .with("movingInitialValue", RawValue::Null)
    }

    #[test]
    fn test_function_signature() {
        let f = Function::from_row(&make_function_row("test", vec![], "void", false)).unwrap();
        assert_eq!(f.name(), "test(): void");

        let f = Function::from_row(&make_function_row(
            "slon_object_constructor",
            vec!["slon_symbol", "slon"],
            "slon_object",
            false,
        ))
        .unwrap();
        assert_eq!(f.name(), "slon_object_constructor(slon_symbol, slon): slon_object");

        let row = make_function_row("slon_query", vec!["slon_node"], "slon", true);
        let f = Function::from_row(&row).unwrap();
        assert_eq!(f.name(), "slon_query(slon_node): setof slon");
    }

    #[test]
    fn test_overloads_do_not_collide() {
        let a = make_function_row("f", vec!["text"], "text", false);
        let b = make_function_row("f", vec!["integer"], "text", false);
        let a = Function::from_row(&a).unwrap();
        let b = Function::from_row(&b).unwrap();
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn test_function_cost_is_float() {
        let record = Function::from_row(&make_function_row("test", vec![], "void", false))
            .unwrap()
            .to_record()
            .unwrap();
        assert_eq!(record.get("cost"), Some(&Value::Float(100.0)));
        assert_eq!(record.get("argumentTypes"), Some(&Value::List(vec![])));
    }

    #[test]
    fn test_aggregate_detail_shares_the_function_name() {
        let function = make_function_row("jsonb_delta", vec!["jsonb"], "jsonb", false)
            .with("kind", "a")
            .with("language", "internal");
        let function = Function::from_row(&function).unwrap().to_record().unwrap();
        let detail = make_aggregate_detail_row("jsonb_delta", vec!["jsonb"], "jsonb");
        let detail = AggregateDetail::from_row(&detail)
            .unwrap()
            .to_record()
            .unwrap();

        assert_eq!(function.name(), "jsonb_delta(jsonb): jsonb");
        assert_eq!(detail.name(), function.name());
        assert_eq!(detail.namespace(), function.namespace());
        assert_ne!(detail.identity(), function.identity());
        assert_eq!(function.get("kind"), Some(&Value::from("a")));
        assert_eq!(detail.kind(), Kind::AggregateDetail);
    }

    #[test]
    fn test_aggregate_detail_record() {
        let row = make_aggregate_detail_row("jsonb_delta", vec!["jsonb"], "jsonb");
        let record = AggregateDetail::from_row(&row)
            .unwrap()
            .to_record()
            .unwrap();
        assert_eq!(record.attributes().len(), Kind::AggregateDetail.schema().len());
        assert_eq!(
            record.get("transitionFunction"),
            Some(&Value::from("jsonb_delta_fn"))
        );
        assert_eq!(record.get("finalFunction"), Some(&Value::NotApplicable));
        assert_eq!(record.get("stateType"), Some(&Value::from("jsonb")));
        assert_eq!(record.get("initialValue"), Some(&Value::Absent));
        // Argument and return types only feed the identity name.
        assert_eq!(record.get("returnType"), None);
    }

    #[test]
    fn test_operator_without_commutator() {
        let row = make_operator_row("integer", "<<<", "integer", "boolean");
        let operator = Operator::from_row(&row).unwrap();
        assert_eq!(operator.commutator, None);
        assert_eq!(operator.negator, None);

        let record = operator.to_record().unwrap();
        assert_eq!(record.get("commutator"), Some(&Value::Absent));
        assert_eq!(record.get("join"), Some(&Value::NotApplicable));

        let row = make_operator_row("integer", "<<<", "integer", "boolean")
            .with("commutator", ">>>")
            .with("negator", "-");
        let record = Operator::from_row(&row).unwrap().to_record().unwrap();
        assert_eq!(record.get("commutator"), Some(&Value::from(">>>")));
        assert_eq!(record.get("negator"), Some(&Value::NotApplicable));
    }

    #[test]
    fn test_operator_names() {
        let binary = make_operator_row("integer", "<<<", "integer", "boolean");
        let binary = Operator::from_row(&binary).unwrap();
        assert_eq!(binary.name(), "integer <<< integer = boolean");

        let prefix = make_operator_row("-", "@", "text", "slon_symbol");
        let prefix = Operator::from_row(&prefix).unwrap();
        assert_eq!(prefix.name(), "- @ text = slon_symbol");
    }

    #[test]
    fn test_cast_has_no_namespace() {
        let row = RawRow::new("pg_cast")
            .with("source", "text")
            .with("target", "integer")
            .with("function", "public.int4")
            .with("context", "e")
            .with("method", "f");
        let record = Cast::from_row(&row).unwrap().to_record().unwrap();
        assert_eq!(record.namespace(), "");
        assert_eq!(record.name(), "text -> integer");
    }
}
