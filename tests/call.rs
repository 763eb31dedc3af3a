#[cfg(test)]
mod tests {
    use parley::{Connection, RoutineKind, Statement, call_sql, write_call};
    use parley_memory::{MemoryConnection, Routine, RoutineParameter};
    use parley_tests::{init_logs, silent_logs};

    #[test]
    fn call_strings() {
        assert_eq!(call_sql(RoutineKind::Procedure, "pkg.proc", 0), "{call pkg.proc()}");
        assert_eq!(
            call_sql(RoutineKind::Procedure, "pkg.proc", 3),
            "{call pkg.proc(?,?,?)}"
        );
        assert_eq!(call_sql(RoutineKind::Function, "pkg.fn", 1), "{? = call pkg.fn()}");
        assert_eq!(
            call_sql(RoutineKind::Function, "pkg.fn", 4),
            "{? = call pkg.fn(?,?,?)}"
        );
        assert_eq!(call_sql(RoutineKind::Function, "pkg.fn", 0), "{? = call pkg.fn()}");
        let mut out = String::from("-- ");
        write_call(&mut out, RoutineKind::Procedure, "\"My Schema\".proc", 1);
        assert_eq!(out, "-- {call \"My Schema\".proc(?)}");
    }

    #[tokio::test]
    async fn create() {
        init_logs();
        let mut connection = MemoryConnection::connect("memory://".into())
            .await
            .expect("Could not open the memory connection");
        connection
            .define(Routine::procedure(
                "pkg.proc",
                vec![
                    RoutineParameter::input("a", 4),
                    RoutineParameter::output("b", 4),
                ],
                |_| Ok(()),
            ))
            .define(Routine::function("pkg.fn", 12, vec![], |_| Ok(())));
        let statement = Statement::create_procedure(&mut connection, "pkg.proc", 2)
            .await
            .expect("Failed to prepare the procedure");
        assert_eq!(statement.sql(), Some("{call pkg.proc(?,?)}"));
        assert_eq!(statement.base().sql(), "{call pkg.proc(?,?)}");
        let statement = Statement::create_function(&mut connection, "pkg.fn", 1)
            .await
            .expect("Failed to prepare the function");
        assert_eq!(statement.to_string(), "{? = call pkg.fn()}");
        let statement = statement.into_base();
        assert_eq!(statement.routine().name, "pkg.fn");
        silent_logs! {
            assert!(
                Statement::create_procedure(&mut connection, "pkg.proc", 1).await.is_err(),
                "Wrong number of parameters"
            );
            assert!(
                Statement::create_function(&mut connection, "pkg.proc", 2).await.is_err(),
                "Not a function"
            );
        }
    }

    #[tokio::test]
    async fn long_names() {
        init_logs();
        let mut connection = MemoryConnection::connect("memory://".into())
            .await
            .expect("Could not open the memory connection");
        let name = "é".repeat(600);
        connection.define(Routine::procedure(
            name.clone(),
            vec![RoutineParameter::input("a", 4)],
            |_| Ok(()),
        ));
        silent_logs! {
            let error = Statement::create_procedure(&mut connection, &name, 2)
                .await
                .expect_err("Wrong number of parameters");
            let message = format!("{:#}", error);
            assert!(message.contains("expects 1 placeholders"), "{}", message);
            assert!(message.contains("é..."), "{}", message);
        }
        let mut statement = Statement::create_procedure(&mut connection, &name, 1)
            .await
            .expect("Failed to prepare the procedure");
        silent_logs! {
            let error = statement.execute().await.expect_err("Parameter 1 was not bound");
            assert!(format!("{:#}", error).contains("é..."));
        }
    }
}
