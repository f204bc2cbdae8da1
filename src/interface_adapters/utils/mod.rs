pub mod conn_id;
