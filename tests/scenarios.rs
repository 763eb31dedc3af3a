#[cfg(test)]
mod tests {
    use parley::{
        AsValue, CallableStatement, Connection, Error, ParameterKey, ParameterRegistry, Result,
        SqlType, Statement, Value, ValueCell, converter, future, types,
    };
    use parley_memory::{MemoryConnection, Routine, RoutineParameter, StatementEvent};
    use parley_tests::{init_logs, silent_logs};
    use std::{
        collections::HashMap,
        future::Future,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    /// Statement recording what it receives and answering reads from a script.
    #[derive(Default)]
    struct Scripted {
        events: Vec<StatementEvent>,
        reads: HashMap<ParameterKey, Value>,
        failing: Option<ParameterKey>,
    }

    impl Scripted {
        fn reading(mut self, key: ParameterKey, value: impl Into<Value>) -> Self {
            self.reads.insert(key, value.into());
            self
        }

        fn failing_on(mut self, key: ParameterKey) -> Self {
            self.failing = Some(key);
            self
        }

        fn check(&self, key: &ParameterKey) -> Result<()> {
            if self.failing.as_ref() == Some(key) {
                return Err(Error::msg(format!("Scripted failure on {key}")));
            }
            Ok(())
        }

        fn bind(&mut self, key: ParameterKey, value: Value, sql_type: Option<SqlType>) -> Result<()> {
            self.check(&key)?;
            self.events.push(StatementEvent::BindInput {
                key,
                value,
                sql_type,
            });
            Ok(())
        }

        fn register(&mut self, key: ParameterKey, sql_type: SqlType, type_name: Option<&str>) -> Result<()> {
            self.check(&key)?;
            self.events.push(StatementEvent::BindOutput {
                key,
                sql_type,
                type_name: type_name.map(Into::into),
            });
            Ok(())
        }

        fn read(&mut self, key: ParameterKey) -> Result<Value> {
            self.check(&key)?;
            let value = self.reads.get(&key).cloned().unwrap_or_default();
            self.events.push(StatementEvent::ReadOutput { key });
            Ok(value)
        }
    }

    impl CallableStatement for Scripted {
        fn execute(&mut self) -> impl Future<Output = Result<()>> + Send {
            self.events.push(StatementEvent::Execute);
            future::ready(Ok(()))
        }
        fn bind_index(&mut self, value: Value, index: i32) -> Result<()> {
            self.bind(ParameterKey::Index(index), value, None)
        }
        fn bind_index_typed(&mut self, value: Value, index: i32, sql_type: SqlType) -> Result<()> {
            self.bind(ParameterKey::Index(index), value, Some(sql_type))
        }
        fn bind_name(&mut self, value: Value, name: &str) -> Result<()> {
            self.bind(ParameterKey::Name(name.into()), value, None)
        }
        fn bind_name_typed(&mut self, value: Value, name: &str, sql_type: SqlType) -> Result<()> {
            self.bind(ParameterKey::Name(name.into()), value, Some(sql_type))
        }
        fn register_out_index(&mut self, index: i32, sql_type: SqlType) -> Result<()> {
            self.register(ParameterKey::Index(index), sql_type, None)
        }
        fn register_out_index_struct(
            &mut self,
            index: i32,
            sql_type: SqlType,
            type_name: &str,
        ) -> Result<()> {
            self.register(ParameterKey::Index(index), sql_type, Some(type_name))
        }
        fn register_out_name(&mut self, name: &str, sql_type: SqlType) -> Result<()> {
            self.register(ParameterKey::Name(name.into()), sql_type, None)
        }
        fn register_out_name_struct(
            &mut self,
            name: &str,
            sql_type: SqlType,
            type_name: &str,
        ) -> Result<()> {
            self.register(ParameterKey::Name(name.into()), sql_type, Some(type_name))
        }
        fn read_index(&mut self, index: i32) -> Result<Value> {
            self.read(ParameterKey::Index(index))
        }
        fn read_name(&mut self, name: &str) -> Result<Value> {
            self.read(ParameterKey::Name(name.into()))
        }
        fn clear_bindings(&mut self) -> Result<()> {
            self.events.push(StatementEvent::ClearBindings);
            Ok(())
        }
    }

    #[test]
    fn bind_input() {
        let mut registry = ParameterRegistry::<()>::new();
        let cell = ValueCell::new(42);
        registry
            .register_input(1, cell.clone(), Some(types::INTEGER), None)
            .expect("Failed to register the input");
        let mut statement = Statement::new(Scripted::default());
        registry
            .apply_all(&(), &mut statement)
            .expect("Failed to apply");
        assert_eq!(
            statement.base().events,
            [StatementEvent::BindInput {
                key: ParameterKey::Index(1),
                value: Value::Int32(Some(42)),
                sql_type: Some(types::INTEGER),
            }]
        );

        // The value is taken when applying
        cell.set("changed");
        registry
            .apply_all(&(), &mut statement)
            .expect("Failed to apply");
        assert_eq!(
            statement.base().events.last(),
            Some(&StatementEvent::BindInput {
                key: ParameterKey::Index(1),
                value: Value::Varchar(Some("changed".into())),
                sql_type: Some(types::INTEGER),
            })
        );
    }

    #[tokio::test]
    async fn read_output() {
        let mut registry = ParameterRegistry::<()>::new();
        let out = registry
            .register_output("out", types::VARCHAR, None, None)
            .expect("Failed to register the output");
        let mut statement = Statement::new(
            Scripted::default().reading(ParameterKey::Name("out".into()), "hi"),
        );
        registry
            .apply_all(&(), &mut statement)
            .expect("Failed to apply");
        statement.execute().await.expect("Failed to execute");
        registry
            .read_all(&(), &mut statement)
            .expect("Failed to read back");
        assert_eq!(out.get(), Value::Varchar(Some("hi".into())));
        assert_eq!(
            statement.into_base().events,
            [
                StatementEvent::BindOutput {
                    key: ParameterKey::Name("out".into()),
                    sql_type: types::VARCHAR,
                    type_name: None,
                },
                StatementEvent::Execute,
                StatementEvent::ReadOutput {
                    key: ParameterKey::Name("out".into()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn in_out_converters() {
        let mut registry = ParameterRegistry::<()>::new();
        let encoded = Arc::new(AtomicUsize::new(0));
        let double = converter({
            let encoded = encoded.clone();
            move |_: &(), v: Value| {
                encoded.fetch_add(1, Ordering::Relaxed);
                Ok((i32::try_from_value(v)? * 2).as_value())
            }
        });
        let plus_one = converter(|_: &(), v: Value| Ok((i32::try_from_value(v)? + 1).as_value()));
        let cell = registry
            .register_in_out(
                2,
                ValueCell::new(5),
                types::INTEGER,
                None,
                Some(double),
                Some(plus_one),
            )
            .expect("Failed to register the in-out parameter");
        let mut scripted = Scripted::default().reading(ParameterKey::Index(2), 10);
        {
            let mut statement = Statement::new(&mut scripted);
            registry
                .call(&(), &mut statement)
                .await
                .expect("Failed to call");
            assert_eq!(statement.to_string(), "external callable statement");
        }
        assert_eq!(cell.get(), Value::Int32(Some(11)));
        assert_eq!(encoded.load(Ordering::Relaxed), 1);
        assert_eq!(
            scripted.events,
            [
                StatementEvent::BindInput {
                    key: ParameterKey::Index(2),
                    value: Value::Int32(Some(10)),
                    sql_type: Some(types::INTEGER),
                },
                StatementEvent::BindOutput {
                    key: ParameterKey::Index(2),
                    sql_type: types::INTEGER,
                    type_name: None,
                },
                StatementEvent::Execute,
                StatementEvent::ReadOutput {
                    key: ParameterKey::Index(2),
                },
            ]
        );

        // Applying again encodes the new input once more
        let mut statement = Statement::new(Scripted::default());
        registry
            .apply_all(&(), &mut statement)
            .expect("Failed to apply");
        assert_eq!(encoded.load(Ordering::Relaxed), 2);
        assert_eq!(
            statement.base().events[0],
            StatementEvent::BindInput {
                key: ParameterKey::Index(2),
                value: Value::Int32(Some(22)),
                sql_type: Some(types::INTEGER),
            }
        );
    }

    #[test]
    fn adapter_dispatch() {
        let mut statement = Statement::new(Scripted::default());
        let index = ParameterKey::Index(1);
        let name = ParameterKey::Name("p".into());
        statement
            .bind_input(&index, Value::Null, None)
            .expect("Failed to bind");
        statement
            .bind_input(&name, Value::Null, Some(types::DATE))
            .expect("Failed to bind");
        statement
            .bind_output(&index, types::STRUCT, Some("POINT"))
            .expect("Failed to register");
        statement
            .bind_output(&name, types::ARRAY, None)
            .expect("Failed to register");
        statement.clear_bindings().expect("Failed to clear");
        assert_eq!(statement.sql(), None);
        assert_eq!(
            statement.base_mut().events,
            [
                StatementEvent::BindInput {
                    key: index.clone(),
                    value: Value::Null,
                    sql_type: None,
                },
                StatementEvent::BindInput {
                    key: name.clone(),
                    value: Value::Null,
                    sql_type: Some(types::DATE),
                },
                StatementEvent::BindOutput {
                    key: index,
                    sql_type: types::STRUCT,
                    type_name: Some("POINT".into()),
                },
                StatementEvent::BindOutput {
                    key: name,
                    sql_type: types::ARRAY,
                    type_name: None,
                },
                StatementEvent::ClearBindings,
            ]
        );
    }

    #[test]
    fn stop_at_first_failure() {
        init_logs();
        let mut registry = ParameterRegistry::<()>::new();
        for i in 1..=3 {
            registry
                .register_input(i, ValueCell::new(i), None, None)
                .expect("Failed to register the input");
        }
        let mut statement =
            Statement::new(Scripted::default().failing_on(ParameterKey::Index(2)));
        let error = registry
            .apply_all(&(), &mut statement)
            .expect_err("Binding 2 must fail");
        assert_eq!(error.to_string(), "Scripted failure on 2");
        assert_eq!(statement.base().events.len(), 1, "Only 1 is bound");

        // Converter errors propagate unchanged
        let mut registry = ParameterRegistry::<()>::new();
        let first = registry
            .register_output(1, types::INTEGER, None, None)
            .expect("Failed to register 1");
        let broken = converter(|_: &(), _: Value| Err(Error::msg("Cannot decode")));
        let second = registry
            .register_output(2, types::INTEGER, None, Some(broken))
            .expect("Failed to register 2");
        let mut statement = Statement::new(
            Scripted::default()
                .reading(ParameterKey::Index(1), 1)
                .reading(ParameterKey::Index(2), 2),
        );
        silent_logs! {
            let error = registry
                .read_all(&(), &mut statement)
                .expect_err("Decoding 2 must fail");
            assert_eq!(error.to_string(), "Cannot decode");
        }
        assert_eq!(first.get(), Value::Int32(Some(1)), "1 keeps the value read");
        assert_eq!(second.get(), Value::Null);
    }

    #[tokio::test]
    async fn memory_round_trip() {
        init_logs();
        let mut connection = MemoryConnection::connect("memory://".into())
            .await
            .expect("Could not open the memory connection");
        connection.define(Routine::procedure(
            "acc.transfer",
            vec![
                RoutineParameter::input("amount", types::BIGINT),
                RoutineParameter::in_out("balance", types::BIGINT),
                RoutineParameter::output("note", types::VARCHAR),
            ],
            |args| {
                let amount: i64 = args.get_as("amount")?;
                let balance: i64 = args.get_as("balance")?;
                args.set("balance", balance - amount)?;
                args.set("note", format!("moved {amount}"))
            },
        ));
        let mut registry = ParameterRegistry::<MemoryConnection>::new();
        let amount = ValueCell::new(30_i64);
        registry
            .register_input("amount", amount.clone(), Some(types::BIGINT), None)
            .expect("Failed to register amount");
        let balance = registry
            .register_in_out(2, ValueCell::new(100_i64), types::BIGINT, None, None, None)
            .expect("Failed to register balance");
        let note = registry
            .register_output("note", types::VARCHAR, None, None)
            .expect("Failed to register note");
        let mut statement = Statement::create_procedure(&mut connection, "acc.transfer", 3)
            .await
            .expect("Failed to prepare");
        assert_eq!(statement.to_string(), "{call acc.transfer(?,?,?)}");
        registry
            .call(&connection, &mut statement)
            .await
            .expect("Failed to call");
        assert_eq!(balance.get_as::<i64>().expect("Not an integer"), 70);
        assert_eq!(note.get_as::<String>().expect("Not a string"), "moved 30");
        amount.set(70_i64);
        registry
            .call(&connection, &mut statement)
            .await
            .expect("Failed to call again");
        assert_eq!(balance.get_as::<i64>().expect("Not an integer"), 0);
        assert_eq!(
            statement.base().events()[..3],
            [
                StatementEvent::BindInput {
                    key: ParameterKey::Index(2),
                    value: Value::Int64(Some(100)),
                    sql_type: Some(types::BIGINT),
                },
                StatementEvent::BindOutput {
                    key: ParameterKey::Index(2),
                    sql_type: types::BIGINT,
                    type_name: None,
                },
                StatementEvent::BindInput {
                    key: ParameterKey::Name("amount".into()),
                    value: Value::Int64(Some(30)),
                    sql_type: Some(types::BIGINT),
                },
            ]
        );
    }
}
