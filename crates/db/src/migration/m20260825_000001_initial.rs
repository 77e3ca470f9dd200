//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and RLS policies.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANT & CATALOG TABLES
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;

        // ============================================================
        // PART 3: CASHFLOW TABLES
        // ============================================================
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 4: ORDER TABLES
        // ============================================================
        db.execute_unprepared(ORDERS_SQL).await?;
        db.execute_unprepared(ORDER_ITEMS_SQL).await?;
        db.execute_unprepared(ORDER_ITEM_REFUNDS_SQL).await?;

        // ============================================================
        // PART 5: BOOKING TABLES
        // ============================================================
        db.execute_unprepared(BOOKINGS_SQL).await?;
        db.execute_unprepared(BOOKING_ITEMS_SQL).await?;

        // ============================================================
        // PART 6: ROW-LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Category operation types
CREATE TYPE operation_type AS ENUM (
    'income',
    'expense',
    'technical_income',
    'technical_expense'
);

-- Derived order status
CREATE TYPE order_status AS ENUM (
    'pending',
    'completed',
    'cancelled'
);

-- Order item lifecycle
CREATE TYPE order_item_status AS ENUM (
    'pending',
    'paid',
    'cancelled',
    'deleted'
);

-- Booking and booking item status
CREATE TYPE booking_status AS ENUM (
    'pending',
    'confirmed',
    'completed',
    'cancelled'
);

-- Source of a mirrored ledger entry
CREATE TYPE entry_reason_type AS ENUM (
    'order_item',
    'refund'
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    subdomain VARCHAR(63) UNIQUE,
    billing_plan VARCHAR(50) NOT NULL DEFAULT 'free',
    owner_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_subdomain_format CHECK (subdomain IS NULL OR subdomain ~ '^[a-z0-9-]+$')
);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    email VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_clients_company ON clients(company_id);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    price NUMERIC(20, 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_product_price_non_negative CHECK (price IS NULL OR price >= 0)
);

CREATE INDEX idx_products_company ON products(company_id);
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_wallets_company_name UNIQUE (company_id, name)
);

CREATE INDEX idx_wallets_company ON wallets(company_id);
";

const CATEGORIES_SQL: &str = r"
-- company_id NULL marks a global category visible to all companies
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    operation_type operation_type NOT NULL,
    activity_type VARCHAR(100) NOT NULL DEFAULT 'operating',
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_categories_company ON categories(company_id);
CREATE UNIQUE INDEX uq_categories_company_name
    ON categories(company_id, name) WHERE company_id IS NOT NULL;
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE CASCADE,
    category_id UUID NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    amount NUMERIC(20, 4) NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT,
    reason_type entry_reason_type,
    reason_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_entry_amount_non_negative CHECK (amount >= 0),
    CONSTRAINT chk_entry_reason_pair CHECK (
        (reason_type IS NULL AND reason_id IS NULL)
        OR (reason_type IS NOT NULL AND reason_id IS NOT NULL)
    )
);

CREATE INDEX idx_ledger_entries_company_date ON ledger_entries(company_id, entry_date);
CREATE INDEX idx_ledger_entries_wallet ON ledger_entries(wallet_id);
CREATE INDEX idx_ledger_entries_category ON ledger_entries(category_id);

-- One mirrored entry per source record
CREATE UNIQUE INDEX uq_ledger_entries_reason
    ON ledger_entries(reason_type, reason_id) WHERE reason_type IS NOT NULL;
";

const ORDERS_SQL: &str = r"
CREATE TABLE orders (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    client_id UUID REFERENCES clients(id) ON DELETE SET NULL,
    status order_status NOT NULL DEFAULT 'pending',
    total_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_orders_company ON orders(company_id);
CREATE INDEX idx_orders_client ON orders(client_id);
";

const ORDER_ITEMS_SQL: &str = r"
CREATE TABLE order_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL,
    price NUMERIC(20, 4) NOT NULL,
    discount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    wallet_id UUID REFERENCES wallets(id) ON DELETE RESTRICT,
    status order_item_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_item_quantity_positive CHECK (quantity > 0),
    CONSTRAINT chk_item_discount_non_negative CHECK (discount >= 0),
    CONSTRAINT chk_item_paid_has_wallet CHECK (status <> 'paid' OR wallet_id IS NOT NULL)
);

CREATE INDEX idx_order_items_order ON order_items(order_id);
CREATE INDEX idx_order_items_company ON order_items(company_id);
";

const ORDER_ITEM_REFUNDS_SQL: &str = r"
CREATE TABLE order_item_refunds (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    order_item_id UUID NOT NULL REFERENCES order_items(id) ON DELETE CASCADE,
    refund_quantity INTEGER NOT NULL,
    refund_amount NUMERIC(20, 4) NOT NULL,
    wallet_id UUID NOT NULL REFERENCES wallets(id) ON DELETE RESTRICT,
    reason TEXT,
    refund_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_refund_quantity_positive CHECK (refund_quantity > 0),
    CONSTRAINT chk_refund_amount_positive CHECK (refund_amount > 0)
);

CREATE INDEX idx_order_item_refunds_item ON order_item_refunds(order_item_id);
";

const BOOKINGS_SQL: &str = r"
CREATE TABLE bookings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    start_at TIMESTAMPTZ,
    end_at TIMESTAMPTZ,
    status booking_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_bookings_company ON bookings(company_id);
CREATE INDEX idx_bookings_order ON bookings(order_id);
";

const BOOKING_ITEMS_SQL: &str = r"
CREATE TABLE booking_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    booking_id UUID NOT NULL REFERENCES bookings(id) ON DELETE CASCADE,
    order_item_id UUID NOT NULL REFERENCES order_items(id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL,
    start_at TIMESTAMPTZ,
    end_at TIMESTAMPTZ,
    status booking_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_booking_item_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_booking_items_booking ON booking_items(booking_id);
";

const RLS_SQL: &str = r"
-- Company-scoped tables compare company_id against the transaction-local
-- app.current_company_id set by TenantConnection. Global categories
-- (company_id IS NULL) are readable by every tenant. The table owner
-- (migrator, tests) bypasses the policies; application roles do not.

ALTER TABLE clients ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON clients
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE products ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON products
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE wallets ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON wallets
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE categories ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON categories
    USING (
        company_id IS NULL
        OR company_id = current_setting('app.current_company_id', TRUE)::uuid
    );

ALTER TABLE ledger_entries ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON ledger_entries
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE orders ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON orders
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE order_items ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON order_items
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE order_item_refunds ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON order_item_refunds
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE bookings ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON bookings
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);

ALTER TABLE booking_items ENABLE ROW LEVEL SECURITY;
CREATE POLICY tenant_isolation ON booking_items
    USING (company_id = current_setting('app.current_company_id', TRUE)::uuid);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS booking_items CASCADE;
DROP TABLE IF EXISTS bookings CASCADE;
DROP TABLE IF EXISTS order_item_refunds CASCADE;
DROP TABLE IF EXISTS order_items CASCADE;
DROP TABLE IF EXISTS orders CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS wallets CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

DROP TYPE IF EXISTS entry_reason_type;
DROP TYPE IF EXISTS booking_status;
DROP TYPE IF EXISTS order_item_status;
DROP TYPE IF EXISTS order_status;
DROP TYPE IF EXISTS operation_type;
";
