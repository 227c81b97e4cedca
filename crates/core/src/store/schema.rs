/// SQL statements for creating the DocVault schema.
pub const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY,
    path TEXT NOT NULL,
    title TEXT NOT NULL,
    version INTEGER NOT NULL CHECK (version > 0),
    author TEXT NOT NULL DEFAULT '',
    hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- One document per title; concurrent first uploads of the same name collide here.
CREATE UNIQUE INDEX IF NOT EXISTS idx_documents_title ON documents(title);
CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(hash);

CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY,
    summary TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '',
    start_date_time TEXT NOT NULL,
    end_date_time TEXT NOT NULL,
    customer_name TEXT NOT NULL DEFAULT '',
    job_serial_no TEXT NOT NULL DEFAULT '',
    job_instrument_model TEXT NOT NULL DEFAULT '',
    job_manufacturer TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bookings_start ON bookings(start_date_time);
";
